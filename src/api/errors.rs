use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::RepurposeError;

impl IntoResponse for RepurposeError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            RepurposeError::InvalidQuery(_)
            | RepurposeError::Validation(_)
            | RepurposeError::Config(_) => StatusCode::BAD_REQUEST,
            RepurposeError::NotFound(_) => StatusCode::NOT_FOUND,
            RepurposeError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
            RepurposeError::Api(_) | RepurposeError::Export(_) | RepurposeError::Unknown(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let classification = self.classify();

        (
            status,
            Json(json!({
                "error": self.to_string(),
                "kind": classification.kind,
                "retryable": classification.retryable,
            })),
        )
            .into_response()
    }
}
