use std::sync::Arc;
use std::time::Duration;
use axum::extract::Path;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use repurpose::client::{HttpJobClient, JobClient};
use repurpose::errors::{ErrorKind, RepurposeError};
use repurpose::models::{CreateJobRequest, ExportRequest};
use repurpose::session::{DashboardSession, SessionConfig};
use repurpose::simulator::{DataSource, JobStatus};

const AGENTS: [&str; 6] = ["clinical", "genomics", "research", "market", "patent", "safety"];

async fn create_job(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer secret");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "missing token"})));
    }
    if body["prompt"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "prompt is required"})));
    }
    (StatusCode::OK, Json(json!({"jobId": "JOB777", "status": "queued"})))
}

async fn job_status(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, Json(json!({"detail": "job not found"}))),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "worker crashed"}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "status": "completed",
                "perAgentStatus": AGENTS
                    .iter()
                    .map(|a| json!({"agent": a, "state": "completed", "progress": 100}))
                    .collect::<Vec<_>>(),
            })),
        ),
    }
}

async fn job_results(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({
        "candidates": [
            {"id": 1, "drug": "Baricitinib", "score": 0.91, "patentFlags": ["US-123"]},
            {"id": "c-2", "drug": "Metformin", "score": 0.72, "safetyFlags": null}
        ],
        "explanation": null
    }))
}

async fn job_export(Path(id): Path<String>) -> axum::response::Response {
    if id == "small" {
        return (StatusCode::OK, Json(json!({"detail": "report generator offline"}))).into_response();
    }
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"FDA21_Report_served.pdf\""),
        ],
        vec![b'%'; 3000],
    )
        .into_response()
}

async fn health() -> &'static str {
    "not json"
}

async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/v1/jobs/query", post(create_job))
        .route("/api/v1/jobs/:id/status", get(job_status))
        .route("/api/v1/jobs/:id/results", get(job_results))
        .route("/api/v1/jobs/:id/export", post(job_export))
        .route("/api/v1/health", get(health));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> HttpJobClient {
    HttpJobClient::new(base, Duration::from_secs(5), Some("secret".to_string())).unwrap()
}

#[tokio::test]
async fn test_create_job_returns_backend_id() {
    let base = spawn_backend().await;
    let job_id = client(&base).create_job(&CreateJobRequest::new("Find kinase inhibitors")).await.unwrap();
    assert_eq!(job_id, "JOB777");
}

#[tokio::test]
async fn test_missing_token_is_validation_error() {
    let base = spawn_backend().await;
    let anonymous = HttpJobClient::new(&base, Duration::from_secs(5), None).unwrap();
    let err = anonymous.create_job(&CreateJobRequest::new("q")).await.unwrap_err();

    assert!(matches!(err, RepurposeError::Validation(ref m) if m == "missing token"));
    let classification = err.classify();
    assert_eq!(classification.kind, ErrorKind::Validation);
    assert!(!classification.retryable);
}

#[tokio::test]
async fn test_status_error_classification() {
    let base = spawn_backend().await;
    let c = client(&base);

    let not_found = c.get_status("missing").await.unwrap_err();
    assert_eq!(not_found.classify().kind, ErrorKind::Validation);
    assert_eq!(not_found.user_message(), "job not found");

    let server = c.get_status("boom").await.unwrap_err();
    assert!(matches!(server, RepurposeError::Api(ref m) if m == "worker crashed"));
    assert!(server.classify().retryable);
}

#[tokio::test]
async fn test_status_and_results_parse() {
    let base = spawn_backend().await;
    let c = client(&base);

    let status = c.get_status("JOB777").await.unwrap();
    assert_eq!(status.status.as_deref(), Some("completed"));
    assert_eq!(status.per_agent_status.len(), 6);

    let results = c.get_results("JOB777").await.unwrap();
    assert_eq!(results.candidates.len(), 2);
    assert_eq!(results.candidates[0].patent_flags, vec!["US-123".to_string()]);
    assert!(results.candidates[1].safety_flags.is_empty());
}

#[tokio::test]
async fn test_export_accepts_pdf_and_rejects_small_payload() {
    let base = spawn_backend().await;
    let c = client(&base);

    let payload = c.export("JOB777", &ExportRequest::default()).await.unwrap();
    assert_eq!(payload.filename, "FDA21_Report_served.pdf");
    assert_eq!(payload.size(), 3000);

    let err = c.export("small", &ExportRequest::default()).await.unwrap_err();
    assert!(matches!(err, RepurposeError::Export(ref m) if m == "report generator offline"));
}

#[tokio::test]
async fn test_non_json_body_is_unknown_error() {
    let base = spawn_backend().await;
    let err = client(&base).health().await.unwrap_err();
    assert_eq!(err.classify().kind, ErrorKind::Unknown);
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}", addr)).get_status("JOB777").await.unwrap_err();
    let classification = err.classify();
    assert_eq!(classification.kind, ErrorKind::Network);
    assert!(classification.retryable);
}

#[tokio::test]
async fn test_session_follows_http_backend_to_completion() {
    let base = spawn_backend().await;
    let mut config = SessionConfig::default();
    config.poll_interval = Duration::from_millis(50);

    let mut handle = DashboardSession::new("Find kinase inhibitors", config)
        .with_client(Arc::new(client(&base)))
        .start();

    let snapshot = tokio::time::timeout(Duration::from_secs(10), handle.wait())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.job_id, "JOB777");
    assert_eq!(snapshot.source, DataSource::Backend);
    assert_eq!(snapshot.status, JobStatus::Completed);
    assert!(snapshot.agents.iter().all(|a| a.progress == 100));
}
