use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::ai::InferenceError;
use crate::cloudflare::FirewallApiError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    InvalidInput(String),

    /// A required credential is not configured.
    #[error("{0}")]
    ConfigurationMissing(String),

    /// The model or firewall API failed or could not be reached.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// Non-success upstream reply, relayed verbatim.
    #[error("upstream returned HTTP {status}")]
    UpstreamStatus { status: u16, body: Value },
}

impl ApiError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::ConfigurationMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl From<InferenceError> for ApiError {
    fn from(err: InferenceError) -> Self {
        ApiError::UpstreamUnavailable(format!("AI service error: {}", err))
    }
}

impl From<FirewallApiError> for ApiError {
    fn from(err: FirewallApiError) -> Self {
        ApiError::UpstreamUnavailable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::UpstreamStatus { body, .. } => body,
            ApiError::UpstreamUnavailable(message) => {
                error!(error = %message, "Upstream call failed");
                json!({
                    "error": message,
                    "timestamp": crate::server::timestamp(),
                })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::invalid_input("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ConfigurationMissing("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::UpstreamStatus { status: 403, body: Value::Null }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::UpstreamStatus { status: 42, body: Value::Null }.status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_inference_error_message() {
        let err = ApiError::from(InferenceError::Rejected("quota exceeded".to_string()));
        assert_eq!(err.to_string(), "AI service error: quota exceeded");
    }
}
