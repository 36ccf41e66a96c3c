//! "Hire a developer" enquiries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corpsite_core::{AdminId, HireDeveloperId, HireDeveloperStatus};

use super::input::{MAX_LINE, Violations, blank_as_none, flex_decimal};
use super::lead::admin_notes;
use crate::error::AppError;

/// A staffing enquiry with budget and quote tracking.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HireDeveloper {
    pub id: HireDeveloperId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub technology: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub budget_min: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub budget_max: Decimal,
    pub timeline: String,
    pub developers_needed: String,
    pub engagement_type: String,
    pub status: HireDeveloperStatus,
    pub admin_notes: String,
    pub reviewed_by: Option<AdminId>,
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub quoted_amount: Option<Decimal>,
    pub quoted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public enquiry body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HireDeveloperDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub technology: Option<String>,
    #[serde(deserialize_with = "flex_decimal")]
    pub budget_min: Option<Decimal>,
    #[serde(deserialize_with = "flex_decimal")]
    pub budget_max: Option<Decimal>,
    pub timeline: Option<String>,
    pub developers_needed: Option<String>,
    pub engagement_type: Option<String>,
}

/// A validated enquiry ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHireDeveloper {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub technology: String,
    pub budget_min: Decimal,
    pub budget_max: Decimal,
    pub timeline: String,
    pub developers_needed: String,
    pub engagement_type: String,
}

impl HireDeveloperDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` for missing or malformed fields, and
    /// `BadRequest` when the budget range is inverted.
    pub fn validate(self) -> Result<NewHireDeveloper, AppError> {
        let mut v = Violations::new();
        let enquiry = NewHireDeveloper {
            name: v.text("name", self.name, MAX_LINE),
            email: v.email("email", self.email),
            phone: v.text("phone", self.phone, 30),
            company: v.text("company", self.company, MAX_LINE),
            technology: v.text("technology", self.technology, MAX_LINE),
            budget_min: v.amount("budgetMin", self.budget_min),
            budget_max: v.amount("budgetMax", self.budget_max),
            timeline: v.text("timeline", self.timeline, MAX_LINE),
            developers_needed: v.text("developersNeeded", self.developers_needed, MAX_LINE),
            engagement_type: v.text("engagementType", self.engagement_type, MAX_LINE),
        };
        v.finish()?;

        if enquiry.budget_max <= enquiry.budget_min {
            return Err(AppError::bad_request(
                "Maximum budget must be greater than minimum budget",
            ));
        }
        Ok(enquiry)
    }
}

/// `update/{id}` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HireDeveloperUpdateDraft {
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<HireDeveloperStatus>,
    pub admin_notes: Option<String>,
    #[serde(deserialize_with = "flex_decimal")]
    pub quoted_amount: Option<Decimal>,
}

/// A validated enquiry update. `None` leaves the column unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HireDeveloperUpdate {
    pub status: Option<HireDeveloperStatus>,
    pub admin_notes: Option<String>,
    /// Setting a quote also stamps `quoted_at`.
    pub quoted_amount: Option<Decimal>,
}

impl HireDeveloperUpdateDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<HireDeveloperUpdate, AppError> {
        let mut v = Violations::new();
        let admin_notes = admin_notes(&mut v, self.admin_notes);
        v.non_negative("quotedAmount", self.quoted_amount);
        v.finish()?;
        Ok(HireDeveloperUpdate {
            status: self.status,
            admin_notes,
            quoted_amount: self.quoted_amount,
        })
    }
}

/// Filters for the admin enquiry list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HireDeveloperFilter {
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<HireDeveloperStatus>,
    /// Case-insensitive substring of the technology.
    pub technology: Option<String>,
}

/// A list page plus per-status counts over every enquiry.
#[derive(Debug, Clone, Serialize)]
pub struct HireDeveloperPage {
    #[serde(flatten)]
    pub page: corpsite_core::Page<HireDeveloper>,
    pub stats: BTreeMap<&'static str, i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(min: &str, max: &str) -> HireDeveloperDraft {
        serde_json::from_value(serde_json::json!({
            "name": "Linus",
            "email": "linus@example.com",
            "phone": "555",
            "company": "Acme",
            "technology": "Rust",
            "budgetMin": min,
            "budgetMax": max,
            "timeline": "3 months",
            "developersNeeded": "2",
            "engagementType": "Contract"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_enquiry() {
        let enquiry = draft("1000", "2500.50").validate().unwrap();
        assert_eq!(enquiry.budget_max, Decimal::new(250_050, 2));
    }

    #[test]
    fn test_inverted_budget_is_bad_request() {
        let err = draft("5000", "5000").validate().unwrap_err();
        let AppError::BadRequest(message) = err else {
            panic!("expected bad request");
        };
        assert_eq!(message, "Maximum budget must be greater than minimum budget");
    }

    #[test]
    fn test_negative_budget_is_validation_error() {
        let err = draft("-1", "10").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_update_rejects_negative_quote() {
        let draft: HireDeveloperUpdateDraft =
            serde_json::from_value(serde_json::json!({"quotedAmount": -5})).unwrap();
        assert!(draft.validate().is_err());

        let draft: HireDeveloperUpdateDraft =
            serde_json::from_value(serde_json::json!({"status": "quoted", "quotedAmount": "1200"}))
                .unwrap();
        let update = draft.validate().unwrap();
        assert_eq!(update.status, Some(HireDeveloperStatus::Quoted));
        assert_eq!(update.quoted_amount, Some(Decimal::from(1200)));
    }

    #[test]
    fn test_budget_serialises_as_number() {
        let now = Utc::now();
        let enquiry = HireDeveloper {
            id: HireDeveloperId::new(1),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            technology: String::new(),
            budget_min: Decimal::new(1050, 1),
            budget_max: Decimal::from(200),
            timeline: String::new(),
            developers_needed: String::new(),
            engagement_type: String::new(),
            status: HireDeveloperStatus::New,
            admin_notes: String::new(),
            reviewed_by: None,
            reviewed_at: None,
            quoted_amount: None,
            quoted_at: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&enquiry).unwrap();
        assert_eq!(json["budgetMin"], serde_json::json!(105.0));
        assert!(json["quotedAmount"].is_null());
    }
}
