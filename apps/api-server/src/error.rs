//! Error types for the HTTP surface and for process startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domain::CoreError;
use thiserror::Error;
use tracing::error;

use crate::config::ConfigError;

/// Failure of a single request, rendered as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed body or path; never reaches storage.
    #[error("{0}")]
    Validation(String),
    #[error("address not found")]
    NotFound,
    #[error(transparent)]
    Storage(CoreError),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidId(_) => Self::Validation(e.to_string()),
            CoreError::NotFound => Self::NotFound,
            CoreError::Repository(_) => Self::Storage(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(http_common::json_detail(&detail)),
            )
                .into_response(),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(http_common::json_detail(http_common::ADDRESS_NOT_FOUND)),
            )
                .into_response(),
            ApiError::Storage(e) => {
                error!(err = ?e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(http_common::json_detail(http_common::INTERNAL_SERVER_ERROR)),
                )
                    .into_response()
            }
        }
    }
}

/// Anything that stops the server from coming up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot install tracing subscriber: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),
    #[error("cannot initialise storage: {0}")]
    Storage(#[from] CoreError),
    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
