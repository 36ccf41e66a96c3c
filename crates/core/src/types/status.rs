//! Status and category enums for site entities.
//!
//! The wire names (serde) and the `PostgreSQL` enum labels are identical so a
//! value round-trips unchanged between the JSON API and the database.

use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value} (expected one of: {expected})")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    expected: String,
}

/// Common behaviour of the string-backed enums in this module.
pub trait Labelled: Sized + Copy + 'static {
    /// Human-readable type name used in error messages.
    const KIND: &'static str;
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// The wire / database label of this variant.
    fn as_str(self) -> &'static str;

    /// Parse a label, returning a descriptive error listing valid values.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVariant`] if no variant has the given label.
    fn parse_label(value: &str) -> Result<Self, UnknownVariant> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == value)
            .ok_or_else(|| UnknownVariant {
                kind: Self::KIND,
                value: value.to_owned(),
                expected: Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Status of a lead that an admin triages.
///
/// Every lead starts in its initial status; moving it anywhere else records
/// which admin reviewed it and when.
pub trait TriageStatus: Labelled + PartialEq {
    /// Status assigned on submission.
    const INITIAL: Self;

    /// Whether setting this status should stamp the reviewing admin.
    fn marks_review(self) -> bool {
        self != Self::INITIAL
    }
}

macro_rules! labelled_display {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_label(s)
            }
        }
    };
}

// =============================================================================
// Lead statuses
// =============================================================================

/// Contact form triage status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.contact_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl Labelled for ContactStatus {
    const KIND: &'static str = "contact status";
    const ALL: &'static [Self] = &[Self::New, Self::InProgress, Self::Resolved, Self::Closed];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl TriageStatus for ContactStatus {
    const INITIAL: Self = Self::New;
}

labelled_display!(ContactStatus);

/// Job application pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.job_application_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum JobApplicationStatus {
    #[default]
    New,
    Reviewed,
    Shortlisted,
    Interviewed,
    Rejected,
    Hired,
}

impl Labelled for JobApplicationStatus {
    const KIND: &'static str = "job application status";
    const ALL: &'static [Self] = &[
        Self::New,
        Self::Reviewed,
        Self::Shortlisted,
        Self::Interviewed,
        Self::Rejected,
        Self::Hired,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewed => "reviewed",
            Self::Shortlisted => "shortlisted",
            Self::Interviewed => "interviewed",
            Self::Rejected => "rejected",
            Self::Hired => "hired",
        }
    }
}

impl TriageStatus for JobApplicationStatus {
    const INITIAL: Self = Self::New;
}

labelled_display!(JobApplicationStatus);

/// "Hire a developer" lead status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.hire_developer_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum HireDeveloperStatus {
    #[default]
    New,
    Reviewed,
    Quoted,
    Negotiating,
    Accepted,
    Rejected,
}

impl Labelled for HireDeveloperStatus {
    const KIND: &'static str = "hire developer status";
    const ALL: &'static [Self] = &[
        Self::New,
        Self::Reviewed,
        Self::Quoted,
        Self::Negotiating,
        Self::Accepted,
        Self::Rejected,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Reviewed => "reviewed",
            Self::Quoted => "quoted",
            Self::Negotiating => "negotiating",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl TriageStatus for HireDeveloperStatus {
    const INITIAL: Self = Self::New;
}

labelled_display!(HireDeveloperStatus);

// =============================================================================
// Open position categories
// =============================================================================

/// Employment type of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "site.job_type"))]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "Full-time"))]
    FullTime,
    #[serde(rename = "Part-time")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "Part-time"))]
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl Labelled for JobType {
    const KIND: &'static str = "job type";
    const ALL: &'static [Self] = &[
        Self::FullTime,
        Self::PartTime,
        Self::Contract,
        Self::Internship,
        Self::Freelance,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Internship => "Internship",
            Self::Freelance => "Freelance",
        }
    }
}

labelled_display!(JobType);

/// Salary currency of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.currency", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

impl Labelled for Currency {
    const KIND: &'static str = "currency";
    const ALL: &'static [Self] = &[Self::Inr, Self::Usd, Self::Eur];

    fn as_str(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }
}

labelled_display!(Currency);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_serde_names() {
        for status in ContactStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        for job_type in JobType::ALL {
            let json = serde_json::to_string(job_type).unwrap();
            assert_eq!(json, format!("\"{}\"", job_type.as_str()));
        }
        for currency in Currency::ALL {
            let json = serde_json::to_string(currency).unwrap();
            assert_eq!(json, format!("\"{}\"", currency.as_str()));
        }
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            "in_progress".parse::<ContactStatus>().unwrap(),
            ContactStatus::InProgress
        );
        assert_eq!("Part-time".parse::<JobType>().unwrap(), JobType::PartTime);
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
    }

    #[test]
    fn test_parse_label_lists_expected_values() {
        let err = "archived".parse::<ContactStatus>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("archived"));
        assert!(message.contains("new, in_progress, resolved, closed"));
    }

    #[test]
    fn test_marks_review_only_off_initial() {
        assert!(!ContactStatus::New.marks_review());
        assert!(ContactStatus::Resolved.marks_review());
        assert!(!JobApplicationStatus::New.marks_review());
        assert!(JobApplicationStatus::Hired.marks_review());
        assert!(HireDeveloperStatus::Quoted.marks_review());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ContactStatus::default(), ContactStatus::New);
        assert_eq!(HireDeveloperStatus::default(), HireDeveloperStatus::New);
        assert_eq!(Currency::default(), Currency::Inr);
    }
}
