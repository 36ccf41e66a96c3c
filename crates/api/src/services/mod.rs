//! Business logic services for the back office.
//!
//! # Services
//!
//! - `auth` - Password login and rotating refresh tokens
//! - `uploads` - Files stored on local disk and served under `/uploads`

pub mod auth;
pub mod uploads;

pub use auth::{AdminStore, AuthError, AuthService, JwtKeys, TokenPair, TokenService};
pub use uploads::{UploadCategory, UploadError, UploadStore};
