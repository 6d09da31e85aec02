use tracing::{info, warn};
use crate::cli::commands::ResultsArgs;
use crate::config::Settings;
use crate::db::Database;
use crate::errors::{with_retry, RepurposeError};
use crate::models::JobHistoryEntry;
use crate::render::tables::render_candidates;
use crate::utils::validation::validate_job_id;

pub async fn handle_results(args: ResultsArgs, settings: Settings) -> Result<(), RepurposeError> {
    let job_id = validate_job_id(&args.job_id)?.to_string();
    let client = super::backend_client(&settings)?;

    let results = with_retry("get_results", &settings.retry, || {
        let client = client.clone();
        let job_id = job_id.clone();
        async move { client.get_results(&job_id).await }
    })
    .await?;
    info!(job_id = %job_id, candidates = results.candidates.len(), "Results fetched");

    let db = Database::new(&settings.database_path)?.with_limits(settings.history);
    let entry = JobHistoryEntry::completed(
        &job_id,
        args.query.as_deref().unwrap_or_default(),
        results.candidates.len() as u32,
    );
    if let Err(e) = db.record_job(&entry) {
        warn!(job_id = %job_id, error = %e, "Failed to record job history");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", render_candidates(&results.candidates));
    }
    Ok(())
}
