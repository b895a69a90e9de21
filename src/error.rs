use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Text too large: {0}")]
    PayloadTooLarge(String),

    #[error("Audio generation failed: {0}")]
    SynthesisFailure(String),

    #[error("Audio generation timed out: {0}")]
    SynthesisTimeout(String),

    #[error("Audio encoding failed: {0}")]
    EncodingFailure(String),
}

/// Error response structure - simplified to just message + status code
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::SynthesisFailure(_) | Self::SynthesisTimeout(_) | Self::EncodingFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Strip engine and encoder detail from server-side failures.
    ///
    /// Client errors keep their message since it names the offending field.
    pub fn redacted(self) -> Self {
        const DETAIL: &str = "see server logs for details";
        match self {
            Self::SynthesisFailure(_) => Self::SynthesisFailure(DETAIL.to_string()),
            Self::SynthesisTimeout(_) => Self::SynthesisTimeout(DETAIL.to_string()),
            Self::EncodingFailure(_) => Self::EncodingFailure(DETAIL.to_string()),
            other => other,
        }
    }

    /// Convert to simplified error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                "Request rejected"
            );
        }

        let error_response = self.to_response();

        (status, Json(error_response)).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
