use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::generator::GenerateError;
use crate::util::error_response;

/// Failures of a single `/v1/messages` request, one variant per HTTP outcome.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Body is not a valid Messages request.
    #[error("Invalid JSON: {0}")]
    InvalidRequest(String),

    /// The generator ran and exited non-zero. Carries its stderr.
    #[error("{0}")]
    Generator(String),

    /// The generator exceeded its time bound.
    #[error("{0}")]
    Timeout(String),

    /// Anything else that went wrong while invoking the generator.
    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Generator(_) | ProxyError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::InvalidRequest(e.to_string())
    }
}

impl From<GenerateError> for ProxyError {
    fn from(e: GenerateError) -> Self {
        let msg = e.to_string();
        match e {
            GenerateError::Failed { .. } => ProxyError::Generator(msg),
            GenerateError::Timeout { .. } => ProxyError::Timeout(msg),
            GenerateError::Spawn { .. } | GenerateError::Other(_) => ProxyError::Internal(msg),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}
