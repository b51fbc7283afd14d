use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Detection backend errors
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("detection backend unreachable: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("detection backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("detection response could not be decoded: {0}")]
    Decode(String),

    #[error("detection request timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("detection request cancelled")]
    Cancelled,
}

/// Translation provider errors
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("provider request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("translation batch timed out after {0:?}")]
    TimedOut(std::time::Duration),

    #[error("translation batch cancelled")]
    Cancelled,
}

/// Startup-time credential errors. Any of these stops the process before it binds.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("credentials variable {0} is not set")]
    Missing(String),

    #[error("credentials are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported credentials type {0:?} (expected \"service_account\")")]
    UnsupportedType(String),

    #[error("credentials field {0} is empty")]
    EmptyField(&'static str),

    #[error("private key is not a valid RSA PEM key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// Errors surfaced to HTTP callers. The payload carries a fixed message only.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("detection failed: {0}")]
    DetectionFailed(#[from] DetectionError),

    #[error("translation failed: {0}")]
    TranslationFailed(#[from] TranslationError),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidUpload(_) | GatewayError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::DetectionFailed(_) | GatewayError::TranslationFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller
    pub fn public_message(&self) -> &'static str {
        match self {
            GatewayError::InvalidUpload(_) => "Image upload failed",
            GatewayError::InvalidRequest(_) => "Invalid request",
            GatewayError::DetectionFailed(_) => "Object detection failed",
            GatewayError::TranslationFailed(_) => "Translation failed",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.public_message() })),
        )
            .into_response()
    }
}
