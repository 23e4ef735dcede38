use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::types::{ManifestSummary, Upstream};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{api} API responded with status {status}")]
    UpstreamStatus {
        api: Upstream,
        status: u16,
        /// `error` / `msg` field of the upstream body, when it had one.
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unexpected {api} payload: {reason}")]
    Payload { api: Upstream, reason: String },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Inputs the NEO visualization transform cannot produce a payload for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("NEO {id} has no close approach data")]
    EmptyApproachHistory { id: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

// ---------------------------------------------------------------------------
// HTTP error payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestSummary>,
}

/// Error returned by route handlers: a status plus the `{error, details}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                details,
                manifest: None,
            },
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error, None)
    }

    /// 500 with a route-specific summary; the cause goes into `details`.
    pub fn internal(summary: &str, cause: &AppError) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            summary,
            Some(cause.to_string()),
        )
    }

    pub fn with_manifest(mut self, manifest: ManifestSummary) -> Self {
        self.body.manifest = Some(manifest);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), details = ?self.body.details, "{}", self.body.error);
        } else {
            warn!(status = status.as_u16(), "{}", self.body.error);
        }
        (status, Json(self.body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError::internal("Internal Server Error", &e)
    }
}

/// Attach a route summary to a failed upstream call.
pub trait ResultExt<T> {
    fn context(self, summary: &str) -> std::result::Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, summary: &str) -> std::result::Result<T, ApiError> {
        self.map_err(|e| ApiError::internal(summary, &e))
    }
}
