//! Job applications submitted from the careers page.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use corpsite_core::{AdminId, JobApplicationId, JobApplicationStatus};

use super::StoredFile;
use super::input::{MAX_LINE, MAX_TEXT, Violations, blank_as_none};
use crate::error::AppError;

/// A job application and its review state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    /// Unique application ID.
    pub id: JobApplicationId,
    /// Applicant name.
    pub name: String,
    /// Lowercased applicant email.
    pub email: String,
    /// Applicant phone number.
    pub phone: String,
    /// Position applied for, as typed by the applicant.
    pub job_title: String,
    /// Free-form experience summary.
    pub experience: String,
    /// Cover letter; empty when none was given.
    pub cover_letter: String,
    /// Uploaded resume, if any.
    pub resume: Option<StoredFile>,
    /// Pipeline status.
    pub status: JobApplicationStatus,
    /// Internal notes.
    pub admin_notes: String,
    /// Admin who last moved the application out of `new`.
    pub reviewed_by: Option<AdminId>,
    /// When that happened.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// When the application was submitted.
    pub created_at: DateTime<Utc>,
    /// When the application was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Public application form fields. The resume arrives as a file part.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplicationDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub experience: Option<String>,
    pub cover_letter: Option<String>,
}

/// A validated application ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub experience: String,
    pub cover_letter: String,
    pub resume: Option<StoredFile>,
}

impl JobApplicationDraft {
    /// Validate the text fields; the resume is attached afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate(self) -> Result<NewJobApplication, AppError> {
        let mut v = Violations::new();
        let application = NewJobApplication {
            name: v.text("name", self.name, MAX_LINE),
            email: v.email("email", self.email),
            phone: v.text("phone", self.phone, 30),
            job_title: v.text("jobTitle", self.job_title, MAX_LINE),
            experience: v.text("experience", self.experience, MAX_LINE),
            cover_letter: v
                .optional_text("coverLetter", self.cover_letter, MAX_TEXT)
                .unwrap_or_default(),
            resume: None,
        };
        v.finish()?;
        Ok(application)
    }
}

/// Filters for the admin application list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobApplicationFilter {
    #[serde(deserialize_with = "blank_as_none")]
    pub status: Option<JobApplicationStatus>,
    /// Case-insensitive substring of the job title.
    pub job_title: Option<String>,
}

/// Applications per job title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobTitleCount {
    pub job_title: String,
    pub count: i64,
}

/// `job-applications/stats` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationStats {
    pub total_applications: i64,
    pub recent_applications: i64,
    pub status_counts: BTreeMap<&'static str, i64>,
    /// Ten most applied-for titles.
    pub job_title_stats: Vec<JobTitleCount>,
}
