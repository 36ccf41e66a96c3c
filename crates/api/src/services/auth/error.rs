//! Admin authentication error types.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication and token operations.
///
/// Display strings are shown to clients for 4xx variants.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] corpsite_core::EmailError),

    /// Unknown email or wrong password; the two are not distinguished.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Current password did not match on a password change.
    #[error("Invalid old password")]
    InvalidOldPassword,

    /// No refresh token in the cookie or body.
    #[error("Unauthorized request")]
    MissingRefreshToken,

    /// Refresh token is malformed, badly signed, expired, or names no admin.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// Refresh token is genuine but no longer the stored one.
    #[error("Refresh token is expired or used")]
    StaleRefreshToken,

    /// Access token missing, invalid, or not an admin token.
    #[error("unauthorized access")]
    InvalidAccessToken,

    /// An admin with this email already exists.
    #[error("User with email already Exists")]
    EmailTaken,

    /// Password too short.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Admin not found.
    #[error("User not found")]
    UserNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing failed.
    #[error("token encoding error: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// HTTP status this error maps to.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidEmail(_) | Self::WeakPassword { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::InvalidOldPassword
            | Self::MissingRefreshToken
            | Self::InvalidRefreshToken
            | Self::StaleRefreshToken
            | Self::InvalidAccessToken => StatusCode::UNAUTHORIZED,
            Self::EmailTaken | Self::Repository(RepositoryError::Conflict(_)) => {
                StatusCode::CONFLICT
            }
            Self::UserNotFound | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::PasswordHash
            | Self::TokenEncoding(_)
            | Self::Repository(RepositoryError::Database(_) | RepositoryError::DataCorruption(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::StaleRefreshToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::WeakPassword { min: 8 }.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::Repository(RepositoryError::DataCorruption("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages() {
        assert_eq!(AuthError::MissingRefreshToken.to_string(), "Unauthorized request");
        assert_eq!(
            AuthError::EmailTaken.to_string(),
            "User with email already Exists"
        );
        assert_eq!(
            AuthError::WeakPassword { min: 8 }.to_string(),
            "Password must be at least 8 characters"
        );
    }
}
