//! IBM Cloud client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IbmCloudError {
    #[error("Required environment variable not set: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IAM authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Pagination protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Pager is exhausted, no further pages to fetch")]
    PagerExhausted,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IbmCloudError>;

impl IbmCloudError {
    /// Build an `Api` error from a non-success response, extracting the
    /// service's message from the body when it matches a known envelope.
    pub(crate) fn api(status: reqwest::StatusCode, body: &str) -> Self {
        IbmCloudError::Api {
            status: status.as_u16(),
            message: error_message(body),
        }
    }
}

/// Pull a human-readable message out of an IBM error body.
///
/// The platform services answer with a few different envelopes:
/// `{"errors": [{"code", "message"}]}` (resource controller/manager),
/// `{"errorCode", "errorMessage"}` (IAM) and plain `{"message"}`.
pub(crate) fn error_message(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            let trimmed = body.trim();
            return if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.to_string()
            };
        }
    };

    value
        .get("errors")
        .and_then(|errors| errors.get(0))
        .and_then(|error| error.get("message"))
        .or_else(|| value.get("errorMessage"))
        .or_else(|| value.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}
