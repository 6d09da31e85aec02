use std::path::PathBuf;
use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "repurpose", version, about = "Drug-repurposing job console with a live agent dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and REPURPOSE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a query and follow its agents live
    Run(RunArgs),
    /// Start the dashboard HTTP API server
    Serve(ServeArgs),
    /// Show the status of a backend job
    Status(StatusArgs),
    /// Show the ranked candidates of a completed job
    Results(ResultsArgs),
    /// Download a job's report
    Export(ExportArgs),
    /// Show local job and export history
    History(HistoryArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Research question, e.g. "Find kinase inhibitors for Alzheimer's disease"
    pub query: String,

    /// Run the local simulation without contacting the backend
    #[arg(long)]
    pub demo: bool,

    /// Print the final snapshot as JSON instead of live bars
    #[arg(long)]
    pub json: bool,

    /// Seed for the simulation's random source
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bind to an existing backend job instead of creating one
    #[arg(long)]
    pub job: Option<String>,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// SQLite database path (overrides config)
    #[arg(long)]
    pub db: Option<String>,

    /// Run every session as a local simulation
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args, Clone)]
pub struct StatusArgs {
    /// Backend job id
    pub job_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep polling until the job completes or fails
    #[arg(long)]
    pub follow: bool,
}

#[derive(Args, Clone)]
pub struct ResultsArgs {
    /// Backend job id
    pub job_id: String,

    /// Query text to store in history alongside the job
    #[arg(long)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Backend job id
    pub job_id: String,

    /// Report format: pdf, xlsx, pptx
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Directory the report is written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Leave the audit trail out of the report
    #[arg(long)]
    pub no_audit_trail: bool,
}

#[derive(Args, Clone)]
pub struct HistoryArgs {
    /// Show exports instead of jobs
    #[arg(long)]
    pub exports: bool,

    /// Show aggregate statistics
    #[arg(long)]
    pub stats: bool,

    /// Delete all local history
    #[arg(long)]
    pub clear: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: PathBuf,
}
