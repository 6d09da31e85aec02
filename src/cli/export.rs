use console::style;
use tracing::info;
use crate::cli::commands::ExportArgs;
use crate::config::Settings;
use crate::db::Database;
use crate::errors::{with_retry, RepurposeError};
use crate::models::{ExportFormat, ExportRequest};
use crate::utils::formatting::format_file_size;
use crate::utils::validation::validate_job_id;

pub async fn handle_export(args: ExportArgs, settings: Settings) -> Result<(), RepurposeError> {
    let job_id = validate_job_id(&args.job_id)?.to_string();
    let format = ExportFormat::parse(&args.format)
        .ok_or_else(|| RepurposeError::Validation(format!("unknown export format '{}'", args.format)))?;
    let request = ExportRequest {
        formats: vec![format],
        include_audit_trail: !args.no_audit_trail,
    };

    let client = super::backend_client(&settings)?;
    let payload = with_retry("export", &settings.retry, || {
        let client = client.clone();
        let job_id = job_id.clone();
        let request = request.clone();
        async move { client.export(&job_id, &request).await }
    })
    .await?;

    tokio::fs::create_dir_all(&args.output).await?;
    let path = args.output.join(&payload.filename);
    tokio::fs::write(&path, &payload.bytes).await?;
    info!(job_id = %job_id, path = %path.display(), bytes = payload.size(), "Report written");

    let db = Database::new(&settings.database_path)?.with_limits(settings.history);
    db.record_export(&job_id, format.as_str(), payload.size())?;

    println!(
        "  {} {} ({})",
        style("✓").green(),
        path.display(),
        format_file_size(payload.size())
    );
    Ok(())
}
