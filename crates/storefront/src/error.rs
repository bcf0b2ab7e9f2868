//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Errors render as JSON: `{ "error": "..." }`, plus `details` for validation
//! failures.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::payments::PaymentError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request body is not valid JSON for the endpoint.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] JsonRejection),

    /// Request body is JSON but a field is missing or has the wrong type.
    #[error("Invalid request data: {field}: {message}")]
    InvalidField { field: String, message: String },

    /// Request body parsed but failed field validation.
    #[error("Invalid request data: {0}")]
    Validation(#[from] ValidationErrors),

    /// Payment provider call failed.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Checkout is disabled because Allpay credentials are missing.
    #[error("Payment service not configured")]
    PaymentNotConfigured,

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_)
            | Self::InvalidField { .. }
            | Self::Validation(_)
            | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::PaymentNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Payment(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Payment(_) | Self::Session(_) | Self::Internal(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Validation(errors) => json!({
                "error": "Invalid request data",
                "details": errors,
            }),
            Self::InvalidField { field, message } => json!({
                "error": "Invalid request data",
                "details": { field.as_str(): [{ "code": "invalid_type", "message": message }] },
            }),
            Self::InvalidJson(rejection) => json!({ "error": rejection.body_text() }),
            Self::Payment(PaymentError::Refused(message)) => json!({ "error": message }),
            Self::Payment(_) => json!({ "error": "Failed to create checkout session" }),
            Self::Session(_) | Self::Internal(_) => json!({ "error": "Internal server error" }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for AppError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let message = err.inner().to_string();
        let path = err.path().to_string();
        let mut field = if path == "." { String::new() } else { path };

        // Missing fields are reported at their parent; point at the field itself
        if let Some(name) = message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.strip_suffix('`'))
        {
            if !field.is_empty() {
                field.push('.');
            }
            field.push_str(name);
        }
        if field.is_empty() {
            field.push_str("body");
        }

        Self::InvalidField { field, message }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
