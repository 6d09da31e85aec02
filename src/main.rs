use clap::Parser;
use tracing_subscriber::EnvFilter;
use repurpose::cli::{self, Commands};
use repurpose::config;
use repurpose::errors::RepurposeError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (_, 0) => "warn",
        (_, 1) => "info",
        (_, 2) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = dispatch(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            RepurposeError::Config(_) | RepurposeError::Yaml(_) => 2,
            RepurposeError::Network(_) => 3,
            RepurposeError::Validation(_) | RepurposeError::Api(_) | RepurposeError::Unknown(_) => 4,
            RepurposeError::InvalidQuery(_) => 5,
            RepurposeError::Export(_) => 6,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}

async fn dispatch(cli: cli::Cli) -> Result<(), RepurposeError> {
    if let Commands::Validate(args) = &cli.command {
        return handle_validate(&args.config).await;
    }

    let mut settings = config::load_settings(cli.config.as_deref()).await?;
    if let Some(url) = cli.api_url {
        settings.api_url = url;
    }

    match cli.command {
        Commands::Run(args) => cli::run::handle_run(args, settings, cli.quiet).await,
        Commands::Serve(args) => cli::serve::handle_serve(args, settings).await,
        Commands::Status(args) => cli::status::handle_status(args, settings).await,
        Commands::Results(args) => cli::results::handle_results(args, settings).await,
        Commands::Export(args) => cli::export::handle_export(args, settings).await,
        Commands::History(args) => cli::history::handle_history(args, settings).await,
        Commands::Validate(_) => Ok(()),
    }
}

async fn handle_validate(path: &std::path::Path) -> Result<(), RepurposeError> {
    let parsed = config::parse_config(path).await?;
    let settings = config::Settings::from_config(&parsed);
    println!("Configuration is valid: {}", path.display());
    println!("  backend: {}", settings.api_url);
    println!("  database: {}", settings.database_path);
    Ok(())
}
