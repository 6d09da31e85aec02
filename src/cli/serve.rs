use crate::cli::commands::ServeArgs;
use crate::config::Settings;
use crate::errors::RepurposeError;
use crate::api;
use tracing::info;

pub async fn handle_serve(args: ServeArgs, mut settings: Settings) -> Result<(), RepurposeError> {
    if let Some(db) = args.db {
        settings.database_path = db;
    }
    info!(
        host = %args.host,
        port = args.port,
        backend = %settings.api_url,
        offline = args.offline,
        "Starting dashboard API server"
    );

    let state = api::create_app_state(&settings, args.offline).await?;
    let sessions = state.sessions.clone();
    let app = api::build_router(state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .map_err(|e| RepurposeError::Internal(format!("Server error: {}", e)))?;

    for entry in sessions.iter() {
        entry.value().stop();
    }
    Ok(())
}
