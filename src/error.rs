//! Error types and handling for the weather dashboard

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the dashboard proxies
#[derive(Error, Debug)]
pub enum DashboardError {
    /// A required request parameter was missing or empty
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The process is missing configuration a request depends on
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The weather provider answered with a failure or could not be reached
    #[error("Upstream error: {message}")]
    Upstream { message: String },
}

impl DashboardError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// The missing-credential error shared by both proxies
    #[must_use]
    pub fn missing_api_key() -> Self {
        Self::config("API key not configured")
    }

    /// HTTP status the error surfaces as
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Validation { .. } => StatusCode::BAD_REQUEST,
            DashboardError::Config { .. } | DashboardError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-friendly error message
    ///
    /// Upstream failures collapse to `upstream_message`; the provider's own
    /// status or transport error is never echoed to the client.
    #[must_use]
    pub fn user_message(&self, upstream_message: &str) -> String {
        match self {
            DashboardError::Validation { message } | DashboardError::Config { message } => {
                message.clone()
            }
            DashboardError::Upstream { .. } => upstream_message.to_string(),
        }
    }
}

/// A [`DashboardError`] paired with the fixed message an endpoint reports for
/// upstream failures.
#[derive(Debug)]
pub struct ApiError {
    error: DashboardError,
    upstream_message: &'static str,
}

impl ApiError {
    #[must_use]
    pub fn new(error: DashboardError, upstream_message: &'static str) -> Self {
        Self {
            error,
            upstream_message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "request failed");
        } else {
            tracing::debug!(error = %self.error, "request rejected");
        }
        let body = Json(json!({ "error": self.error.user_message(self.upstream_message) }));
        (status, body).into_response()
    }
}
