use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Validation,
}

/// Error body returned by the event ingress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failures at the transport boundary, before an event reaches the workflow.
#[derive(Debug, Error)]
pub enum IngressError {
    #[error("missing or invalid bot token")]
    Unauthorized,
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

impl IngressError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthorized => ErrorCode::Unauthorized,
            Self::MalformedEvent(_) => ErrorCode::Validation,
        }
    }
}

impl From<IngressError> for ApiError {
    fn from(value: IngressError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
