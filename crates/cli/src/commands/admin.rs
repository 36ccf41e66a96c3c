//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! corpsite-cli admin create -e admin@example.com -m 5550100 -p 'long-password'
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use corpsite_api::db::{AdminRepository, RepositoryError};
use corpsite_api::models::NewAdmin;
use corpsite_api::services::AdminStore;
use corpsite_api::services::auth::{hash_password, validate_password};
use corpsite_core::{AdminId, Email};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Could not reach the database.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Mobile number is blank.
    #[error("Mobile number is required")]
    MissingMobile,

    /// Password rejected or could not be hashed.
    #[error("{0}")]
    Password(#[from] corpsite_api::services::AuthError),

    /// User already exists.
    #[error("Admin already exists with email: {0}")]
    UserExists(String),

    /// Repository error.
    #[error("Database error: {0}")]
    Repository(RepositoryError),
}

/// Create an admin account directly, bypassing the HTTP bootstrap.
///
/// # Returns
///
/// The ID of the created admin.
///
/// # Errors
///
/// Returns `AdminError` for invalid input, an existing email, or a
/// database failure.
pub async fn create_user(email: &str, mobile: &str, password: &str) -> Result<AdminId, AdminError> {
    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let mobile = mobile.trim();
    if mobile.is_empty() {
        return Err(AdminError::MissingMobile);
    }

    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let pool = connect().await?;
    let repo = AdminRepository::new(&pool);

    tracing::info!("Creating admin: {}", email);

    let admin = repo
        .create(NewAdmin {
            email: email.clone(),
            mobile: mobile.to_owned(),
            password_hash,
            avatar: None,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AdminError::UserExists(email.into_inner()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("Admin created successfully! ID: {}, Email: {}", admin.id, admin.email);

    Ok(admin.id)
}
