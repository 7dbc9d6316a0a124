//! Error types returned by the relay and upload handlers

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// Failure while relaying an upload to the remote server.
///
/// Every variant is reported to the caller as `500 Proxy error: ...` with a
/// wildcard `Access-Control-Allow-Origin`, so the browser GUI can read it.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed form data: {0}")]
    Multipart(String),

    #[error("missing form field '{0}'")]
    MissingField(&'static str),

    #[error("invalid remote port '{0}'")]
    InvalidPort(String),

    #[error("invalid remote url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl From<MultipartRejection> for RelayError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart(rejection.body_text())
    }
}

impl From<MultipartError> for RelayError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err.body_text())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let message = error_chain(&self);
        tracing::warn!("Proxy error: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
            format!("Proxy error: {}", message),
        )
            .into_response()
    }
}

/// Failure while accepting a zip upload
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No ZIP file uploaded")]
    MissingFile,

    #[error("Invalid ZIP filename '{0}'")]
    InvalidFilename(String),

    #[error("Malformed upload: {0}")]
    Multipart(String),

    #[error("Failed to save ZIP file: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultipartRejection> for UploadError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart(rejection.body_text())
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart(err.body_text())
    }
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::InvalidFilename(_) | Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("Rejected ZIP upload: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Flatten an error and its sources into one line.
/// reqwest hides the interesting part ("Connection refused") in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
