use std::time::Duration;
use async_trait::async_trait;
use reqwest::{header, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use crate::errors::RepurposeError;
use crate::models::{
    CreateJobRequest, CreateJobResponse, ExportPayload, ExportRequest, JobResultsResponse,
    JobStatusResponse,
};
use super::provider::JobClient;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`JobClient`] over the backend's JSON HTTP API.
pub struct HttpJobClient {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpJobClient {
    pub fn new(base_url: &str, timeout: Duration, auth_token: Option<String>) -> Result<Self, RepurposeError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| RepurposeError::Config(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RepurposeError::Config(format!("Backend URL cannot be a base: {}", base_url)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RepurposeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            auth_token: auth_token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `<base>/api/v1/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["api", "v1"]).extend(segments);
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        debug!(%method, %url, "Backend request");
        let builder = self.client.request(method, url);
        match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, RepurposeError> {
        let resp = builder
            .send()
            .await
            .map_err(|e| RepurposeError::Network(format!("Backend request failed: {}", e)))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Err(RepurposeError::from_status(status.as_u16(), &body))
    }

    async fn json<T: DeserializeOwned>(&self, builder: reqwest::RequestBuilder) -> Result<T, RepurposeError> {
        let resp = self.send(builder).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RepurposeError::Network(format!("Failed to read backend response: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RepurposeError::Unknown(format!("Unexpected backend response: {}", e)))
    }
}

#[async_trait]
impl JobClient for HttpJobClient {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<String, RepurposeError> {
        let url = self.endpoint(&["jobs", "query"]);
        let resp: CreateJobResponse = self
            .json(self.request(reqwest::Method::POST, url).json(request))
            .await?;
        if resp.job_id.trim().is_empty() {
            return Err(RepurposeError::Unknown("Backend returned an empty job id".into()));
        }
        Ok(resp.job_id)
    }

    async fn get_status(&self, job_id: &str) -> Result<JobStatusResponse, RepurposeError> {
        let url = self.endpoint(&["jobs", job_id, "status"]);
        self.json(self.request(reqwest::Method::GET, url)).await
    }

    async fn get_results(&self, job_id: &str) -> Result<JobResultsResponse, RepurposeError> {
        let url = self.endpoint(&["jobs", job_id, "results"]);
        self.json(self.request(reqwest::Method::GET, url)).await
    }

    async fn export(&self, job_id: &str, request: &ExportRequest) -> Result<ExportPayload, RepurposeError> {
        let url = self.endpoint(&["jobs", job_id, "export"]);
        let resp = self
            .send(self.request(reqwest::Method::POST, url).json(request))
            .await?;

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let disposition = resp
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RepurposeError::Network(format!("Failed to download report: {}", e)))?;

        ExportPayload::accept(job_id, bytes.to_vec(), content_type, disposition.as_deref())
    }

    async fn health(&self) -> Result<Value, RepurposeError> {
        let url = self.endpoint(&["health"]);
        self.json(self.request(reqwest::Method::GET, url)).await
    }

    fn backend_name(&self) -> &str {
        self.base_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = HttpJobClient::new("http://localhost:8000/", DEFAULT_TIMEOUT, None).unwrap();
        assert_eq!(
            client.endpoint(&["jobs", "abc", "status"]).as_str(),
            "http://localhost:8000/api/v1/jobs/abc/status"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_ids() {
        let client = HttpJobClient::new("http://example.com/backend", DEFAULT_TIMEOUT, None).unwrap();
        assert_eq!(
            client.endpoint(&["jobs", "#AB12CD34", "results"]).as_str(),
            "http://example.com/backend/api/v1/jobs/%23AB12CD34/results"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let err = HttpJobClient::new("not a url", DEFAULT_TIMEOUT, None).err().unwrap();
        assert!(matches!(err, RepurposeError::Config(_)));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let client = HttpJobClient::new("http://localhost:8000", DEFAULT_TIMEOUT, Some(String::new())).unwrap();
        assert!(client.auth_token.is_none());
    }
}
