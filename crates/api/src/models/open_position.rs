//! Job openings listed on the careers page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use corpsite_core::{AdminId, Currency, JobType, OpenPositionId};

use super::input::{
    MAX_LINE, StringList, Violations, blank_as_none, flex_bool, flex_decimal, flex_i64,
    non_blank, parse_timestamp,
};
use crate::error::AppError;

/// Highest display priority.
pub const MAX_PRIORITY: i16 = 10;

/// Salary band. Either bound may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Salary {
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub min: Option<Decimal>,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub max: Option<Decimal>,
    pub currency: Currency,
}

impl Salary {
    /// Human-readable band, e.g. `INR 50,000 - 80,000`.
    ///
    /// Zero bounds count as unspecified.
    #[must_use]
    pub fn range_label(&self) -> String {
        let positive = |d: Option<Decimal>| d.filter(|d| d.is_sign_positive() && !d.is_zero());
        match (positive(self.min), positive(self.max)) {
            (Some(min), Some(max)) => format!(
                "{} {} - {}",
                self.currency,
                group_thousands(min),
                group_thousands(max)
            ),
            (Some(min), None) => format!("{} {}+", self.currency, group_thousands(min)),
            (None, Some(max)) => format!("Up to {} {}", self.currency, group_thousands(max)),
            (None, None) => "Not specified".to_string(),
        }
    }
}

/// Format with comma thousands separators, dropping trailing zero decimals.
fn group_thousands(amount: Decimal) -> String {
    let text = amount.normalize().to_string();
    let (whole, fraction) = text.split_once('.').map_or((text.as_str(), None), |(w, f)| (w, Some(f)));

    let digits: Vec<char> = whole.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    match fraction {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// An open position as admins see it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPosition {
    pub id: OpenPositionId,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub experience: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub salary: Salary,
    pub is_active: bool,
    pub is_remote: bool,
    pub application_deadline: Option<DateTime<Utc>>,
    pub posted_by: AdminId,
    pub tags: Vec<String>,
    pub priority: i16,
    /// Derived from `salary`.
    pub salary_range: String,
    /// Active and the deadline, if any, has not passed.
    pub is_accepting_applications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OpenPosition {
    /// Whether applications are open at `now`.
    #[must_use]
    pub fn accepts_applications_at(
        is_active: bool,
        deadline: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        is_active && deadline.is_none_or(|d| d >= now)
    }
}

/// The public-site view: everything except visibility and authorship.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicOpenPosition {
    pub id: OpenPositionId,
    pub title: String,
    pub department: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub experience: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub salary: Salary,
    pub salary_range: String,
    pub is_remote: bool,
    pub application_deadline: Option<DateTime<Utc>>,
    pub is_accepting_applications: bool,
    pub tags: Vec<String>,
    pub priority: i16,
    pub created_at: DateTime<Utc>,
}

impl From<OpenPosition> for PublicOpenPosition {
    fn from(p: OpenPosition) -> Self {
        Self {
            id: p.id,
            title: p.title,
            department: p.department,
            location: p.location,
            job_type: p.job_type,
            experience: p.experience,
            description: p.description,
            requirements: p.requirements,
            responsibilities: p.responsibilities,
            benefits: p.benefits,
            salary: p.salary,
            salary_range: p.salary_range,
            is_remote: p.is_remote,
            application_deadline: p.application_deadline,
            is_accepting_applications: p.is_accepting_applications,
            tags: p.tags,
            priority: p.priority,
            created_at: p.created_at,
        }
    }
}

// =============================================================================
// Drafts
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SalaryFields {
    #[serde(deserialize_with = "flex_decimal")]
    min: Option<Decimal>,
    #[serde(deserialize_with = "flex_decimal")]
    max: Option<Decimal>,
    #[serde(deserialize_with = "blank_as_none")]
    currency: Option<Currency>,
}

/// Salary as an object, or as that object JSON-encoded in a form field.
#[derive(Debug, Default)]
pub struct SalaryDraft(SalaryFields);

impl<'de> Deserialize<'de> for SalaryDraft {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Fields(SalaryFields),
            Encoded(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Fields(fields) => Ok(Self(fields)),
            Raw::Encoded(text) if text.trim().is_empty() => Ok(Self::default()),
            Raw::Encoded(text) => serde_json::from_str(&text)
                .map(Self)
                .map_err(|_| serde::de::Error::custom("Invalid salary format")),
        }
    }
}

/// Create and update body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenPositionDraft {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type", deserialize_with = "blank_as_none")]
    pub job_type: Option<JobType>,
    pub experience: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<StringList>,
    pub responsibilities: Option<StringList>,
    pub benefits: Option<StringList>,
    pub tags: Option<StringList>,
    pub salary: Option<SalaryDraft>,
    #[serde(deserialize_with = "flex_bool")]
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "flex_bool")]
    pub is_remote: Option<bool>,
    pub application_deadline: Option<String>,
    #[serde(deserialize_with = "flex_i64")]
    pub priority: Option<i64>,
}

/// Validated position fields. `None` leaves a column unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenPositionFields {
    pub title: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub experience: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    /// Replaces the whole band when present.
    pub salary: Option<Salary>,
    pub is_active: Option<bool>,
    pub is_remote: Option<bool>,
    pub application_deadline: Option<DateTime<Utc>>,
    pub priority: Option<i16>,
}

impl OpenPositionDraft {
    /// Validate a new position. Lists and flags fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_new(self) -> Result<OpenPositionFields, AppError> {
        let mut fields = self.validate(true)?;
        fields.responsibilities.get_or_insert_with(Vec::new);
        fields.benefits.get_or_insert_with(Vec::new);
        fields.tags.get_or_insert_with(Vec::new);
        fields.salary.get_or_insert_with(Salary::default);
        fields.is_active.get_or_insert(true);
        fields.is_remote.get_or_insert(false);
        fields.priority.get_or_insert(0);
        Ok(fields)
    }

    /// Validate a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_patch(self) -> Result<OpenPositionFields, AppError> {
        self.validate(false)
    }

    fn validate(self, creating: bool) -> Result<OpenPositionFields, AppError> {
        let mut v = Violations::new();
        let text = |v: &mut Violations, name: &str, value: Option<String>, max: usize| {
            if creating {
                Some(v.text(name, value, max))
            } else {
                v.optional_text(name, value, max)
            }
        };

        let title = text(&mut v, "title", self.title, 100);
        let department = text(&mut v, "department", self.department, 50);
        let location = text(&mut v, "location", self.location, 100);
        let experience = text(&mut v, "experience", self.experience, 50);
        let description = text(&mut v, "description", self.description, 2000);

        if creating && self.job_type.is_none() {
            v.push("type is required");
        }

        let requirements = self.requirements.map(StringList::into_inner);
        match &requirements {
            None if creating => v.push("At least one requirement is required"),
            Some(items) if items.is_empty() => v.push("At least one requirement is required"),
            _ => {}
        }

        let salary = self.salary.map(|SalaryDraft(s)| {
            v.non_negative("salary.min", s.min);
            v.non_negative("salary.max", s.max);
            if let (Some(min), Some(max)) = (s.min, s.max) {
                v.check(
                    min <= max,
                    "Minimum salary cannot be greater than maximum salary",
                );
            }
            Salary {
                min: s.min,
                max: s.max,
                currency: s.currency.unwrap_or_default(),
            }
        });

        let application_deadline = non_blank(self.application_deadline.as_deref()).and_then(|raw| {
            let parsed = parse_timestamp(raw, true);
            v.check(parsed.is_some(), "applicationDeadline is not a valid date");
            parsed
        });

        let priority = self.priority.map(|p| {
            let in_range = (0..=i64::from(MAX_PRIORITY)).contains(&p);
            v.check(in_range, format!("priority must be between 0 and {MAX_PRIORITY}"));
            i16::try_from(p.clamp(0, i64::from(MAX_PRIORITY))).unwrap_or_default()
        });

        let list = |items: Option<StringList>, v: &mut Violations, name: &str| {
            let items = items.map(StringList::into_inner);
            if let Some(items) = &items {
                v.check(
                    items.iter().all(|i| i.chars().count() <= MAX_LINE),
                    format!("{name} entries cannot exceed {MAX_LINE} characters"),
                );
            }
            items
        };
        let responsibilities = list(self.responsibilities, &mut v, "responsibilities");
        let benefits = list(self.benefits, &mut v, "benefits");
        let tags = list(self.tags, &mut v, "tags");

        v.finish()?;

        Ok(OpenPositionFields {
            title,
            department,
            location,
            job_type: self.job_type,
            experience,
            description,
            requirements,
            responsibilities,
            benefits,
            tags,
            salary,
            is_active: self.is_active,
            is_remote: self.is_remote,
            application_deadline,
            priority,
        })
    }
}

/// Filters shared by the admin list and the public listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenPositionFilter {
    /// Case-insensitive substring.
    pub department: Option<String>,
    /// Case-insensitive substring.
    pub location: Option<String>,
    #[serde(rename = "type", deserialize_with = "blank_as_none")]
    pub job_type: Option<JobType>,
    #[serde(deserialize_with = "flex_bool")]
    pub is_active: Option<bool>,
}

/// Public listing query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicPositionQuery {
    pub department: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type", deserialize_with = "blank_as_none")]
    pub job_type: Option<JobType>,
    pub search: Option<String>,
}

/// Active positions per department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}

/// Active positions per employment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct JobTypeCount {
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub job_type: JobType,
    pub count: i64,
}

/// `open-positions/stats` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPositionStats {
    pub overview: super::stats::ActiveCounts,
    pub by_department: Vec<DepartmentCount>,
    pub by_type: Vec<JobTypeCount>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft(json: serde_json::Value) -> OpenPositionDraft {
        serde_json::from_value(json).unwrap()
    }

    fn valid() -> serde_json::Value {
        serde_json::json!({
            "title": "Rust Engineer",
            "department": "Engineering",
            "location": "Pune",
            "type": "Full-time",
            "experience": "3+ years",
            "description": "Build services",
            "requirements": "Rust, SQL"
        })
    }

    #[test]
    fn test_salary_range_label() {
        let band = |min: Option<i64>, max: Option<i64>| Salary {
            min: min.map(Decimal::from),
            max: max.map(Decimal::from),
            currency: Currency::Inr,
        };
        assert_eq!(band(Some(50_000), Some(1_200_000)).range_label(), "INR 50,000 - 1,200,000");
        assert_eq!(band(Some(900), None).range_label(), "INR 900+");
        assert_eq!(band(None, Some(75_000)).range_label(), "Up to INR 75,000");
        assert_eq!(band(Some(0), None).range_label(), "Not specified");
        assert_eq!(band(None, None).range_label(), "Not specified");
    }

    #[test]
    fn test_group_thousands_keeps_fraction() {
        assert_eq!(group_thousands(Decimal::new(123_456_750, 2)), "1,234,567.5");
        assert_eq!(group_thousands(Decimal::from(100)), "100");
    }

    #[test]
    fn test_accepting_applications() {
        let now = Utc::now();
        assert!(OpenPosition::accepts_applications_at(true, None, now));
        assert!(OpenPosition::accepts_applications_at(true, Some(now + Duration::days(1)), now));
        assert!(!OpenPosition::accepts_applications_at(true, Some(now - Duration::days(1)), now));
        assert!(!OpenPosition::accepts_applications_at(false, None, now));
    }

    #[test]
    fn test_validate_new_fills_defaults() {
        let fields = draft(valid()).validate_new().unwrap();
        assert_eq!(fields.requirements, Some(vec!["Rust".into(), "SQL".into()]));
        assert_eq!(fields.is_active, Some(true));
        assert_eq!(fields.is_remote, Some(false));
        assert_eq!(fields.priority, Some(0));
        assert_eq!(fields.salary, Some(Salary::default()));
        assert_eq!(fields.job_type, Some(JobType::FullTime));
    }

    #[test]
    fn test_salary_from_encoded_form_field() {
        let mut json = valid();
        json["salary"] = serde_json::json!(r#"{"min": "40000", "max": 60000, "currency": "USD"}"#);
        let fields = draft(json).validate_new().unwrap();
        let salary = fields.salary.unwrap();
        assert_eq!(salary.currency, Currency::Usd);
        assert_eq!(salary.min, Some(Decimal::from(40_000)));
    }

    #[test]
    fn test_inverted_salary_and_bad_priority() {
        let mut json = valid();
        json["salary"] = serde_json::json!({"min": 10, "max": 5});
        json["priority"] = serde_json::json!("11");
        let AppError::Validation(messages) = draft(json).validate_new().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            messages,
            vec![
                "Minimum salary cannot be greater than maximum salary",
                "priority must be between 0 and 10"
            ]
        );
    }

    #[test]
    fn test_requirements_needed_on_create_only() {
        let mut json = valid();
        json.as_object_mut().unwrap().remove("requirements");
        assert!(draft(json).validate_new().is_err());

        let patch = draft(serde_json::json!({"title": "Senior Rust Engineer"}))
            .validate_patch()
            .unwrap();
        assert!(patch.requirements.is_none());
        assert_eq!(patch.title.as_deref(), Some("Senior Rust Engineer"));

        let cleared = draft(serde_json::json!({"requirements": []})).validate_patch();
        assert!(cleared.is_err());
    }

    #[test]
    fn test_title_length() {
        let mut json = valid();
        json["title"] = serde_json::json!("t".repeat(101));
        assert!(draft(json).validate_new().is_err());
    }

    #[test]
    fn test_public_view_omits_author() {
        let now = Utc::now();
        let position = OpenPosition {
            id: OpenPositionId::new(1),
            title: "T".into(),
            department: "D".into(),
            location: "L".into(),
            job_type: JobType::Contract,
            experience: "E".into(),
            description: "Desc".into(),
            requirements: vec!["r".into()],
            responsibilities: vec![],
            benefits: vec![],
            salary: Salary::default(),
            is_active: true,
            is_remote: true,
            application_deadline: None,
            posted_by: AdminId::new(9),
            tags: vec![],
            priority: 3,
            salary_range: "Not specified".into(),
            is_accepting_applications: true,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(PublicOpenPosition::from(position)).unwrap();
        assert!(json.get("postedBy").is_none());
        assert!(json.get("isActive").is_none());
        assert_eq!(json["type"], "Contract");
        assert_eq!(json["salaryRange"], "Not specified");
    }
}
