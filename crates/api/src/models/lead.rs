//! Admin triage updates shared by the lead entities.

use std::fmt::Display;
use std::str::FromStr;

use serde::Deserialize;

use super::input::{MAX_TEXT, Violations, blank_as_none};
use crate::error::AppError;

/// `update/{id}` body for contacts and job applications.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "S: FromStr, <S as FromStr>::Err: Display"))]
pub struct LeadUpdateDraft<S> {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<S>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// A validated triage update. `None` leaves the column unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadUpdate<S> {
    pub status: Option<S>,
    /// Trimmed; an empty string clears the notes.
    pub admin_notes: Option<String>,
}

impl<S> LeadUpdateDraft<S> {
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the notes are too long.
    pub fn validate(self) -> Result<LeadUpdate<S>, AppError> {
        let mut v = Violations::new();
        let admin_notes = admin_notes(&mut v, self.admin_notes);
        v.finish()?;
        Ok(LeadUpdate {
            status: self.status,
            admin_notes,
        })
    }
}

/// Trim admin notes and check their length.
pub(crate) fn admin_notes(v: &mut Violations, notes: Option<String>) -> Option<String> {
    notes.map(|n| {
        let n = n.trim().to_string();
        v.check(
            n.chars().count() <= MAX_TEXT,
            format!("adminNotes cannot exceed {MAX_TEXT} characters"),
        );
        n
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use corpsite_core::JobApplicationStatus;

    #[test]
    fn test_empty_body_changes_nothing() {
        let draft: LeadUpdateDraft<JobApplicationStatus> = serde_json::from_str("{}").unwrap();
        let update = draft.validate().unwrap();
        assert_eq!(update.status, None);
        assert_eq!(update.admin_notes, None);
    }

    #[test]
    fn test_status_and_notes() {
        let draft: LeadUpdateDraft<JobApplicationStatus> =
            serde_json::from_value(serde_json::json!({
                "status": "shortlisted",
                "adminNotes": "  strong portfolio "
            }))
            .unwrap();
        let update = draft.validate().unwrap();
        assert_eq!(update.status, Some(JobApplicationStatus::Shortlisted));
        assert_eq!(update.admin_notes.as_deref(), Some("strong portfolio"));
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = serde_json::from_value::<LeadUpdateDraft<JobApplicationStatus>>(
            serde_json::json!({"status": "ghosted"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_notes_length_limit() {
        let draft: LeadUpdateDraft<JobApplicationStatus> =
            serde_json::from_value(serde_json::json!({"adminNotes": "x".repeat(MAX_TEXT + 1)}))
                .unwrap();
        assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
    }
}
