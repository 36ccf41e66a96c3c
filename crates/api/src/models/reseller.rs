//! Reseller partnership enquiries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpsite_core::ResellerId;

use super::input::{MAX_LINE, Violations};
use crate::error::AppError;

/// A reseller enquiry. Unlike the other leads it has no triage status.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reseller {
    pub id: ResellerId,
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub business_category: String,
    pub state: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public reseller form body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResellerDraft {
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub business_category: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
}

/// A validated enquiry ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReseller {
    pub name: String,
    pub mobile: String,
    pub email: String,
    pub business_category: String,
    pub state: String,
    pub city: String,
}

impl ResellerDraft {
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<NewReseller, AppError> {
        let mut v = Violations::new();
        let reseller = NewReseller {
            name: v.text("name", self.name, MAX_LINE),
            mobile: v.text("mobile", self.mobile, 30),
            email: v.email("email", self.email),
            business_category: v.text("businessCategory", self.business_category, MAX_LINE),
            state: v.text("state", self.state, 100),
            city: v.text("city", self.city, 100),
        };
        v.finish()?;
        Ok(reseller)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_everything() {
        let draft: ResellerDraft = serde_json::from_value(serde_json::json!({
            "name": " Kiran ",
            "mobile": "98765 43210",
            "email": "Kiran@Shop.IN",
            "businessCategory": "Electronics",
            "state": "Karnataka",
            "city": " Bengaluru"
        }))
        .unwrap();
        let reseller = draft.validate().unwrap();
        assert_eq!(reseller.name, "Kiran");
        assert_eq!(reseller.email, "kiran@shop.in");
        assert_eq!(reseller.city, "Bengaluru");
    }

    #[test]
    fn test_missing_city() {
        let draft: ResellerDraft = serde_json::from_value(serde_json::json!({
            "name": "Kiran",
            "mobile": "1",
            "email": "k@shop.in",
            "businessCategory": "Retail",
            "state": "Goa"
        }))
        .unwrap();
        let AppError::Validation(messages) = draft.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["city is required"]);
    }
}
