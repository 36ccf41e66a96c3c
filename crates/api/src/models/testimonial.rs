//! Customer testimonials shown on the site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpsite_core::TestimonialId;

use super::input::{MAX_LINE, Violations, flex_bool};
use crate::error::AppError;

/// Longest quote that fits the site's testimonial card.
pub const MAX_QUOTE_LENGTH: usize = 150;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: TestimonialId,
    pub quote: String,
    pub name: String,
    /// Job title of the person quoted.
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields the public site renders.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicTestimonial {
    pub id: TestimonialId,
    pub quote: String,
    pub name: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Create and update body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialDraft {
    pub quote: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "flex_bool")]
    pub is_active: Option<bool>,
}

/// Validated testimonial fields. On create every text field is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestimonialFields {
    pub quote: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub is_active: Option<bool>,
}

impl TestimonialDraft {
    /// Validate a new testimonial; every text field is required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_new(self) -> Result<TestimonialFields, AppError> {
        self.validate(true)
    }

    /// Validate a partial update; absent fields stay unchanged.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_patch(self) -> Result<TestimonialFields, AppError> {
        self.validate(false)
    }

    fn validate(self, creating: bool) -> Result<TestimonialFields, AppError> {
        let mut v = Violations::new();
        let mut field = |name: &str, value: Option<String>, max: usize| {
            if creating {
                Some(v.text(name, value, max))
            } else {
                v.optional_text(name, value, max)
            }
        };
        let fields = TestimonialFields {
            quote: field("quote", self.quote, MAX_QUOTE_LENGTH),
            name: field("name", self.name, MAX_LINE),
            title: field("title", self.title, MAX_LINE),
            is_active: self.is_active,
        };
        v.finish()?;
        Ok(fields)
    }
}
