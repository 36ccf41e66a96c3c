//! Unified error handling for the API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::{Envelope, RenderedError};
use crate::services::auth::AuthError;
use crate::services::uploads::UploadError;

/// Application-level error type for every handler.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication or token operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Storing or reading an uploaded file failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Input failed validation; every violation is reported.
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Shorthand for a `BadRequest` error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// HTTP status this error maps to.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => err.status_code(),
            Self::Upload(err) => match err {
                UploadError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Message safe to show to API clients.
    ///
    /// Server errors never expose their internals.
    fn client_message(&self) -> String {
        if self.status_code().is_server_error() {
            return "Internal server error".to_string();
        }
        match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg.clone(),
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Database(RepositoryError::NotFound) => "Resource not found".to_string(),
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Auth(err) => err.to_string(),
            Self::Upload(err) => err.to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "API request error"
            );
        }

        let data = match &self {
            Self::Validation(violations) => Value::from(violations.clone()),
            _ => Value::Null,
        };
        let envelope = Envelope::new(status, self.client_message(), data);

        let mut response = (status, Json(&envelope)).into_response();
        response.extensions_mut().insert(RenderedError {
            envelope,
            detail: format!("{self:?}"),
        });
        response
    }
}

/// Give a repository `NotFound` an entity-specific message.
pub trait RepositoryResultExt<T> {
    /// # Errors
    ///
    /// Returns `AppError::NotFound(message)` for `RepositoryError::NotFound`
    /// and `AppError::Database` for anything else.
    fn or_not_found(self, message: impl Into<String>) -> Result<T, AppError>;
}

impl<T> RepositoryResultExt<T> for Result<T, RepositoryError> {
    fn or_not_found(self, message: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| match e {
            RepositoryError::NotFound => AppError::not_found(message),
            other => AppError::Database(other),
        })
    }
}

/// Set the Sentry user context from an admin ID.
pub fn set_sentry_user(admin_id: i32, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Contact not found".to_string());
        assert_eq!(err.to_string(), "Not found: Contact not found");

        let err = AppError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Validation failed: a; b");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(get_status(AppError::bad_request("x")), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::Unauthorized("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(get_status(AppError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(get_status(AppError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict("dup".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_envelope_for_not_found() {
        let (status, json) = body_json(AppError::not_found("Contact not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Contact not found");
        assert_eq!(json["status"], 404);
        assert!(json["data"].is_null());
        assert!(json.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_validation_lists_every_violation() {
        let err = AppError::Validation(vec!["name is required".into(), "email is invalid".into()]);
        let (status, json) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["data"],
            serde_json::json!(["name is required", "email is invalid"])
        );
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let (status, json) =
            body_json(AppError::Internal("db password is hunter2".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Internal server error");
    }

    #[test]
    fn test_or_not_found_message() {
        let result: Result<(), RepositoryError> = Err(RepositoryError::NotFound);
        let err = result.or_not_found("Testimonial not found").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Testimonial not found"));

        let result: Result<(), RepositoryError> = Err(RepositoryError::Conflict("dup".into()));
        let err = result.or_not_found("Testimonial not found").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_rendered_error_extension_attached() {
        let response = AppError::bad_request("nope").into_response();
        let rendered = response.extensions().get::<RenderedError>().unwrap();
        assert_eq!(rendered.envelope.status, 400);
        assert!(rendered.detail.contains("BadRequest"));
    }
}
