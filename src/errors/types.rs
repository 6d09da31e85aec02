use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepurposeError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// No response was received from the backend.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend rejected the request (4xx).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend failed while handling the request (5xx).
    #[error("API error: {0}")]
    Api(String),

    #[error("Unexpected response: {0}")]
    Unknown(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepurposeError {
    /// Build the error for a backend response with a non-success status,
    /// preferring the backend's own `detail` or `message` text.
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("detail")
            .and_then(|d| d.as_str())
            .or_else(|| body.get("message").and_then(|m| m.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| API_ERROR_MESSAGE.to_string());

        match status {
            400..=499 => RepurposeError::Validation(message),
            500..=599 => RepurposeError::Api(message),
            _ => RepurposeError::Unknown(message),
        }
    }
}

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const API_ERROR_MESSAGE: &str = "Failed to communicate with the server.";
