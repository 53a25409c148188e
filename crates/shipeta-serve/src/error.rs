//! Server and request errors.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shipeta_model::ArtifactError;
use shipeta_types::FeatureError;
use std::net::SocketAddr;
use thiserror::Error;

/// A request that could not be answered with an estimate.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The body is not a well-formed prediction request.
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    /// A feature value is outside the known domain and the policy rejects it.
    #[error(transparent)]
    InvalidFeature(#[from] FeatureError),
}

impl ApiError {
    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::InvalidFeature(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "rejected prediction request");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Errors that stop the server.
#[derive(Error, Debug)]
pub enum ServeError {
    /// The artifact could not be loaded; there is no fallback model.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The listen address is unavailable.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The server failed while running.
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}
