//! Request-layer error mapping.
//!
//! # Invariants
//! - Response bodies carry a fixed message per status; store failure
//!   detail only reaches the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use movies_core::RepoError;
use serde_json::json;
use std::fmt::{Display, Formatter};
use tokio::task::JoinError;

#[derive(Debug)]
pub enum ApiError {
    /// Path id or genre filter did not parse as a non-negative integer.
    InvalidId,
    Repo(RepoError),
    /// The blocking query task panicked or was cancelled.
    Worker(JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::Repo(RepoError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Repo(RepoError::Store(_)) | Self::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid id",
            Self::Repo(RepoError::NotFound(_)) => "movie not found",
            Self::Repo(RepoError::Store(_)) | Self::Worker(_) => "internal server error",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId => write!(f, "invalid id"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Worker(err) => write!(f, "query worker failed: {err}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId => None,
            Self::Repo(err) => Some(err),
            Self::Worker(err) => Some(err),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        Self::Repo(err)
    }
}

impl From<JoinError> for ApiError {
    fn from(err: JoinError) -> Self {
        Self::Worker(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Worker(err) = &self {
            error!("event=http_request module=api status=error error={}", err);
        }
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
