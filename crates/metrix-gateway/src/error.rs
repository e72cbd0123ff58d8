//! HTTP-facing error wrapper.
//!
//! Core errors keep their stable codes; the gateway adds the few failures that
//! only exist at the transport level and maps everything to a status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use metrix_core::{ClientCode, MetrixError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] MetrixError),

    #[error("batch of {got} items exceeds limit of {limit}")]
    BatchTooLarge { got: usize, limit: usize },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("reset is disabled")]
    ResetDisabled,
}

impl ApiError {
    pub fn client_code(&self) -> &'static str {
        match self {
            ApiError::Core(e) => e.client_code().as_str(),
            ApiError::BatchTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ResetDisabled => "NOT_ALLOWED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) => match e.client_code() {
                ClientCode::NotFound => StatusCode::NOT_FOUND,
                ClientCode::AlreadyExists => StatusCode::CONFLICT,
                ClientCode::InvalidKey | ClientCode::InvalidValue => StatusCode::BAD_REQUEST,
                ClientCode::BadConfig
                | ClientCode::UnsupportedVersion
                | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BatchTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ResetDisabled => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(code = self.client_code(), error = %self, "request rejected");
        }
        let body = Json(json!({
            "error": self.client_code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
