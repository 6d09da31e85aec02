use std::sync::Arc;
use console::style;
use tokio::sync::mpsc;
use tracing::{info, warn};
use crate::cli::commands::RunArgs;
use crate::client::JobClient;
use crate::config::Settings;
use crate::db::Database;
use crate::errors::{with_retry, RepurposeError};
use crate::models::JobHistoryEntry;
use crate::render::tables::render_candidates;
use crate::render::DashboardProgress;
use crate::session::{DashboardSession, SessionConfig, SessionEvent};
use crate::simulator::{DataSource, JobSnapshot, JobStatus};
use crate::utils::validation::{validate_job_id, validate_query};

pub async fn handle_run(args: RunArgs, settings: Settings, quiet: bool) -> Result<(), RepurposeError> {
    let query = validate_query(&args.query)?;
    info!(query = %query, demo = args.demo, "Starting dashboard session");

    let client: Option<Arc<dyn JobClient>> = if args.demo {
        None
    } else {
        Some(super::backend_client(&settings)?)
    };

    let mut session = DashboardSession::new(&query, SessionConfig::from(&settings));
    if let Some(client) = &client {
        session = session.with_client(client.clone());
    }
    if let Some(job_id) = &args.job {
        if client.is_none() {
            return Err(RepurposeError::Config("--job needs a backend; drop --demo".to_string()));
        }
        session = session.with_existing_job(validate_job_id(job_id)?);
    }
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut handle = session.with_event_channel(tx).start();

    let mut progress = DashboardProgress::new(&handle.snapshot().await.agents, quiet || args.json);
    if !quiet && !args.json {
        progress.println(&format!("  {} {}", style("Query:").bold(), query));
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                progress.handle_event(&event);
                if matches!(event, SessionEvent::JobFinished { .. }) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                warn!("Interrupted, stopping session");
                handle.stop();
                break;
            }
        }
    }

    let snapshot = handle.wait().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    if let (Some(client), true) = (client, finished_on_backend(&snapshot)) {
        let db = Database::new(&settings.database_path)?.with_limits(settings.history);
        show_results(client, &db, &snapshot, &settings).await?;
    } else if snapshot.source == DataSource::Demo && snapshot.status == JobStatus::Completed && !quiet {
        println!("\n  {}", style("Demo run complete; no backend results to show.").dim());
    }

    Ok(())
}

fn finished_on_backend(snapshot: &JobSnapshot) -> bool {
    snapshot.source == DataSource::Backend && snapshot.status == JobStatus::Completed
}

async fn show_results(
    client: Arc<dyn JobClient>,
    db: &Database,
    snapshot: &JobSnapshot,
    settings: &Settings,
) -> Result<(), RepurposeError> {
    let job_id = snapshot.job_id.clone();
    let results = with_retry("get_results", &settings.retry, || {
        let client = client.clone();
        let job_id = job_id.clone();
        async move { client.get_results(&job_id).await }
    })
    .await?;

    let entry = JobHistoryEntry::completed(&job_id, &snapshot.query, results.candidates.len() as u32);
    if let Err(e) = db.record_job(&entry) {
        warn!(job_id = %job_id, error = %e, "Failed to record job history");
    }

    println!("\n{}", render_candidates(&results.candidates));
    Ok(())
}
