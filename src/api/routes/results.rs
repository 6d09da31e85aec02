use std::sync::Arc;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};
use crate::api::routes::sessions::find_session;
use crate::api::AppState;
use crate::errors::{with_retry, RepurposeError};
use crate::models::{ExportFormat, ExportRequest, JobHistoryEntry, JobResultsResponse};
use crate::simulator::{DataSource, JobStatus};

/// Candidates for a finished session. Demo sessions have no backend results
/// and answer with an empty list.
pub async fn get_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RepurposeError> {
    let handle = find_session(&state, &id)?;
    let snapshot = handle.snapshot().await;

    if snapshot.status != JobStatus::Completed {
        return Err(RepurposeError::Validation(format!(
            "job {} is {}, results are available once it completes",
            snapshot.job_id, snapshot.status
        )));
    }

    if snapshot.source == DataSource::Demo {
        return Ok(Json(json!({
            "jobId": snapshot.job_id,
            "source": DataSource::Demo,
            "candidates": [],
            "explanation": null,
        })));
    }

    let results = match state.cached_results(&snapshot.job_id) {
        Some(cached) => cached,
        None => {
            let client = state
                .client
                .clone()
                .ok_or_else(|| RepurposeError::Config("no backend configured".to_string()))?;
            let job_id = snapshot.job_id.clone();
            let fetched = with_retry("get_results", &state.retry, || {
                let client = client.clone();
                let job_id = job_id.clone();
                async move { client.get_results(&job_id).await }
            })
            .await?;
            let fetched: Arc<JobResultsResponse> = Arc::new(fetched);
            state.cache_results(&snapshot.job_id, fetched.clone());

            let entry = JobHistoryEntry::completed(
                &snapshot.job_id,
                &snapshot.query,
                fetched.candidates.len() as u32,
            );
            if let Err(e) = state.db.record_job(&entry) {
                warn!(job_id = %snapshot.job_id, error = %e, "Failed to record job history");
            }
            info!(job_id = %snapshot.job_id, candidates = fetched.candidates.len(), "Results cached");
            fetched
        }
    };

    Ok(Json(json!({
        "jobId": snapshot.job_id,
        "source": DataSource::Backend,
        "candidates": results.candidates,
        "explanation": results.explanation,
    })))
}

/// Download the report for a backend job and record it in export history.
pub async fn export_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ExportRequest>>,
) -> Result<Response, RepurposeError> {
    let handle = find_session(&state, &id)?;
    let snapshot = handle.snapshot().await;

    if snapshot.source == DataSource::Demo {
        return Err(RepurposeError::Validation(
            "demo jobs have no backend report to export".to_string(),
        ));
    }
    let client = state
        .client
        .clone()
        .ok_or_else(|| RepurposeError::Config("no backend configured".to_string()))?;

    let request = body.map(|Json(r)| r).unwrap_or_default();
    let format = request.formats.first().copied().unwrap_or(ExportFormat::Pdf);
    let job_id = snapshot.job_id.clone();

    let payload = with_retry("export", &state.retry, || {
        let client = client.clone();
        let job_id = job_id.clone();
        let request = request.clone();
        async move { client.export(&job_id, &request).await }
    })
    .await?;

    if let Err(e) = state.db.record_export(&job_id, format.as_str(), payload.size()) {
        warn!(job_id = %job_id, error = %e, "Failed to record export history");
    }
    info!(job_id = %job_id, bytes = payload.size(), filename = %payload.filename, "Report exported");

    let content_type = payload
        .content_type
        .clone()
        .unwrap_or_else(|| "application/pdf".to_string());
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", payload.filename),
        )
        .body(Body::from(payload.bytes))
        .map_err(|e| RepurposeError::Internal(format!("Failed to build export response: {}", e)))
}
