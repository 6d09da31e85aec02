use async_trait::async_trait;
use crate::errors::RepurposeError;
use crate::models::{CreateJobRequest, ExportPayload, ExportRequest, JobResultsResponse, JobStatusResponse};

/// Contract for the analysis backend.
///
/// The session driver and the dashboard API only talk to the backend through
/// this trait, so tests can substitute a scripted implementation.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Submit a query and return the backend job id.
    async fn create_job(&self, request: &CreateJobRequest) -> Result<String, RepurposeError>;

    async fn get_status(&self, job_id: &str) -> Result<JobStatusResponse, RepurposeError>;

    async fn get_results(&self, job_id: &str) -> Result<JobResultsResponse, RepurposeError>;

    /// Download the report. Fails with an export error when the payload does
    /// not look like a report, even if the backend answered 200.
    async fn export(&self, job_id: &str, request: &ExportRequest) -> Result<ExportPayload, RepurposeError>;

    async fn health(&self) -> Result<serde_json::Value, RepurposeError>;

    /// Backend name for logging
    fn backend_name(&self) -> &str;
}
