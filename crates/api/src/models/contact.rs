//! Contact form submissions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpsite_core::{AdminId, ContactId, ContactStatus};

use super::input::{MAX_LINE, MAX_TEXT, Violations};
use crate::error::AppError;

/// Dial code stored when the form omits one.
pub const DEFAULT_COUNTRY_CODE: &str = "+1";

/// A contact form submission and its triage state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    /// Lowercased sender address.
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub message: String,
    pub status: ContactStatus,
    pub admin_notes: String,
    /// Admin who last moved the contact out of `new`.
    pub responded_by: Option<AdminId>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact form body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub country_code: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// A validated contact ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub phone: String,
    pub message: String,
}

impl ContactDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<NewContact, AppError> {
        let mut v = Violations::new();
        let contact = NewContact {
            name: v.text("name", self.name, MAX_LINE),
            email: v.email("email", self.email),
            country_code: v
                .optional_text("countryCode", self.country_code, 8)
                .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
            phone: v.text("phone", self.phone, 30),
            message: v.text("message", self.message, MAX_TEXT),
        };
        v.finish()?;
        Ok(contact)
    }
}

/// Filters for the admin contact list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactFilter {
    #[serde(deserialize_with = "super::input::blank_as_none")]
    pub status: Option<ContactStatus>,
}

/// `contacts/stats` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total_contacts: i64,
    /// Submitted in the last seven days.
    pub recent_contacts: i64,
    pub status_counts: BTreeMap<&'static str, i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_country_code() {
        let contact = ContactDraft {
            name: Some("Ada".into()),
            email: Some("ADA@example.com".into()),
            country_code: None,
            phone: Some("555 0100".into()),
            message: Some("Hello".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(contact.country_code, "+1");
        assert_eq!(contact.email, "ada@example.com");
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let AppError::Validation(messages) = ContactDraft::default().validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "name is required",
                "email is required",
                "phone is required",
                "message is required"
            ]
        );
    }

    #[test]
    fn test_filter_accepts_blank_status() {
        let filter: ContactFilter =
            serde_json::from_value(serde_json::json!({"status": "", "page": 2})).unwrap();
        assert!(filter.status.is_none());
        let filter: ContactFilter =
            serde_json::from_value(serde_json::json!({"status": "resolved"})).unwrap();
        assert_eq!(filter.status, Some(ContactStatus::Resolved));
    }
}
