use serde::Serialize;
use super::types::RepurposeError;

/// Error taxonomy surfaced to users and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorKind {
    Network,
    Validation,
    Api,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "NETWORK",
            Self::Validation => "VALIDATION",
            Self::Api => "API",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub kind: ErrorKind,
    pub retryable: bool,
}

impl RepurposeError {
    /// Classify this error to determine its kind and whether it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            RepurposeError::Network(_) => ErrorClassification {
                kind: ErrorKind::Network,
                retryable: true,
            },
            RepurposeError::Api(_) => ErrorClassification {
                kind: ErrorKind::Api,
                retryable: true,
            },

            // Caller mistakes never get better by repeating them
            RepurposeError::Validation(_) => ErrorClassification {
                kind: ErrorKind::Validation,
                retryable: false,
            },
            RepurposeError::InvalidQuery(_) => ErrorClassification {
                kind: ErrorKind::Validation,
                retryable: false,
            },
            RepurposeError::Config(_) => ErrorClassification {
                kind: ErrorKind::Validation,
                retryable: false,
            },
            RepurposeError::NotFound(_) => ErrorClassification {
                kind: ErrorKind::Validation,
                retryable: false,
            },

            // A short or non-PDF payload usually means the report was not ready
            RepurposeError::Export(_) => ErrorClassification {
                kind: ErrorKind::Api,
                retryable: true,
            },

            RepurposeError::Unknown(_)
            | RepurposeError::Io(_)
            | RepurposeError::Json(_)
            | RepurposeError::Yaml(_)
            | RepurposeError::Database(_)
            | RepurposeError::Internal(_) => ErrorClassification {
                kind: ErrorKind::Unknown,
                retryable: false,
            },
        }
    }

    /// Text suitable for a non-fatal banner.
    pub fn user_message(&self) -> String {
        match self {
            RepurposeError::Network(_) => super::types::NETWORK_ERROR_MESSAGE.to_string(),
            RepurposeError::Validation(m)
            | RepurposeError::Api(m)
            | RepurposeError::Unknown(m)
            | RepurposeError::Export(m)
            | RepurposeError::InvalidQuery(m) => m.clone(),
            other => other.to_string(),
        }
    }
}
