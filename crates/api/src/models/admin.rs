//! Admin account domain types.
//!
//! Password hashes and refresh tokens never appear on [`Admin`]; they are
//! only reachable through the dedicated store methods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpsite_core::{AdminId, Email};

use super::input::{MAX_LINE, Violations};
use crate::error::AppError;
use crate::services::auth::MIN_PASSWORD_LENGTH;

/// An admin account as returned to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: AdminId,
    pub email: Email,
    pub mobile: String,
    /// Relative upload path of the avatar image.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An admin together with its password hash, for credential checks.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub admin: Admin,
    pub password_hash: String,
}

/// Data for inserting an admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: Email,
    pub mobile: String,
    pub password_hash: String,
    pub avatar: Option<String>,
}

/// Partial profile update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub email: Option<Email>,
    pub mobile: Option<String>,
    pub avatar: Option<String>,
}

// =============================================================================
// Request drafts
// =============================================================================

/// `register` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterDraft {
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
}

/// A validated registration before hashing.
#[derive(Debug)]
pub struct Registration {
    pub email: Email,
    pub mobile: String,
    pub password: String,
}

impl RegisterDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<Registration, AppError> {
        let mut v = Violations::new();
        let email = v.email("email", self.email);
        let mobile = v.text("mobile", self.mobile, MAX_LINE);
        let password = password_rule(&mut v, "password", self.password);
        v.finish()?;

        Ok(Registration {
            email: Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?,
            mobile,
            password,
        })
    }
}

/// `login` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginDraft {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginDraft {
    /// Returns the raw email and password.
    ///
    /// The email is not format-checked here: a malformed address simply
    /// fails to match an account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when either field is missing.
    pub fn validate(self) -> Result<(String, String), AppError> {
        let mut v = Violations::new();
        let email = v.text("email", self.email, Email::MAX_LENGTH);
        let password = v.require("password", self.password.filter(|p| !p.is_empty()));
        v.finish()?;
        Ok((email, password))
    }
}

/// `change-password` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordDraft {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

impl ChangePasswordDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<(String, String), AppError> {
        let mut v = Violations::new();
        let old = v.require("oldPassword", self.old_password.filter(|p| !p.is_empty()));
        let new = password_rule(&mut v, "newPassword", self.new_password);
        v.finish()?;
        Ok((old, new))
    }
}

/// `update-profile` text fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDraft {
    pub email: Option<String>,
    pub mobile: Option<String>,
}

impl ProfileDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<ProfileChanges, AppError> {
        let mut v = Violations::new();
        let email = match self.email.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Email::parse(raw) {
                Ok(email) => Some(email),
                Err(e) => {
                    v.push(format!("email is invalid: {e}"));
                    None
                }
            },
        };
        let mobile = v.optional_text("mobile", self.mobile, MAX_LINE);
        v.finish()?;

        Ok(ProfileChanges {
            email,
            mobile,
            avatar: None,
        })
    }
}

fn password_rule(v: &mut Violations, field: &str, value: Option<String>) -> String {
    match value {
        None => {
            v.push(format!("{field} is required"));
            String::new()
        }
        Some(p) => {
            v.check(
                p.chars().count() >= MIN_PASSWORD_LENGTH,
                format!("{field} must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
            p
        }
    }
}
