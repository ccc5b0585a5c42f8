use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error message";
pub const UNKNOWN_ERROR_NAME: &str = "Unknown error name";
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error detail";

/// Structured error body returned by the gateway on a non-2xx response.
/// `http_status` is `None` only when no response was obtained at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    pub message: String,
    pub name: String,
    pub detail: String,
    pub http_status: Option<u16>,
}

impl ErrorDetail {
    pub fn from_body(body: &Value, http_status: u16) -> Self {
        let field = |key: &str, fallback: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string())
        };

        Self {
            message: field("ErrorMessage", UNKNOWN_ERROR_MESSAGE),
            name: field("ErrorName", UNKNOWN_ERROR_NAME),
            detail: field("ErrorDetail", UNKNOWN_ERROR_DETAIL),
            http_status: Some(http_status),
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(code) => write!(f, "HTTP {code} {}: {} ({})", self.name, self.message, self.detail),
            None => write!(f, "{}: {} ({})", self.name, self.message, self.detail),
        }
    }
}

/// Closed failure taxonomy for every gateway operation. No raw transport
/// error escapes the client.
#[derive(Debug, Error)]
pub enum SaferpayError {
    #[error("invalid payment: {0}")]
    Validation(String),
    #[error("payment already processed: {0}")]
    AlreadyProcessed(String),
    #[error("gateway rejected the call: {0}")]
    Gateway(ErrorDetail),
    #[error("failed to reach the gateway: {0}")]
    Connectivity(String),
    #[error("gateway protocol violation: {0}")]
    Protocol(String),
}
