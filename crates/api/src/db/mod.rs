//! Database operations for the back-office `PostgreSQL`.
//!
//! # Schema: `site`
//!
//! ## Tables
//!
//! - `admins` - Admin accounts and their single refresh-token slot
//! - `contacts` - Contact form submissions
//! - `job_applications` - Careers-page applications (resume metadata as JSONB)
//! - `hire_developers` - Staffing enquiries
//! - `resellers` - Reseller enquiries
//! - `open_positions` - Job openings
//! - `products`, `services` - Catalogue entries (image metadata as JSONB)
//! - `testimonials` - Customer quotes
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p corpsite-cli -- migrate
//! ```

pub mod admins;
pub mod catalog;
pub mod contacts;
pub mod dashboard;
pub mod hire_developers;
pub mod job_applications;
pub mod open_positions;
pub mod query;
pub mod resellers;
pub mod testimonials;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use admins::AdminRepository;
pub use catalog::CatalogRepository;
pub use contacts::ContactRepository;
pub use dashboard::DashboardRepository;
pub use hire_developers::HireDeveloperRepository;
pub use job_applications::JobApplicationRepository;
pub use open_positions::OpenPositionRepository;
pub use resellers::ResellerRepository;
pub use testimonials::TestimonialRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
