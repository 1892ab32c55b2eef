//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{CustomerServiceError, LookupError};

/// Application-level error type for the registry.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Postal code lookup failed.
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed domain validation.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<CustomerServiceError> for AppError {
    fn from(err: CustomerServiceError) -> Self {
        match err {
            CustomerServiceError::NotFound(id) => Self::NotFound(format!("customer {id}")),
            CustomerServiceError::InvalidName(e) => Self::Validation(format!("name: {e}")),
            CustomerServiceError::InvalidPostalCode(e) => {
                Self::Validation(format!("postal code: {e}"))
            }
            CustomerServiceError::Lookup(e) => Self::Lookup(e),
            CustomerServiceError::Repository(e) => Self::Database(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Lookup(LookupError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Lookup(LookupError::UnknownPostalCode(_)) | Self::Validation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Lookup(LookupError::Unavailable(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Lookup(LookupError::Unavailable(_)) => "Postal code lookup unavailable".to_string(),
            Self::Lookup(LookupError::UnknownPostalCode(code)) => {
                format!("Unknown postal code: {code}")
            }
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Validation(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_registry_core::{CustomerId, CustomerNameError, PostalCode, PostalCodeError};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("customer 123".to_string());
        assert_eq!(err.to_string(), "Not found: customer 123");

        let err = AppError::Validation("name: name cannot be empty".to_string());
        assert_eq!(err.to_string(), "Validation error: name: name cannot be empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("test".to_string())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Lookup(LookupError::Unavailable("timeout".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(AppError::Lookup(LookupError::UnknownPostalCode(
                PostalCode::parse("99999999").unwrap()
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad row".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let err = AppError::from(CustomerServiceError::NotFound(CustomerId::new(5)));
        assert!(matches!(err, AppError::NotFound(ref what) if what == "customer 5"));

        let err = AppError::from(CustomerServiceError::InvalidName(CustomerNameError::Empty));
        assert!(matches!(err, AppError::Validation(_)));

        let err = AppError::from(CustomerServiceError::InvalidPostalCode(
            PostalCodeError::NonDigit,
        ));
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = AppError::Database(RepositoryError::DataCorruption(
            "secret detail".to_string(),
        ))
        .into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({ "error": "Internal server error" }));
    }
}
