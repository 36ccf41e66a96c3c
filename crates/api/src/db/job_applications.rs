//! Job application repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use corpsite_core::{AdminId, JobApplicationId, JobApplicationStatus, Page, TriageStatus};

use super::RepositoryError;
use super::query::{
    DateRange, Sort, fetch_page, push_contains, push_date_range, push_eq, push_search,
};
use crate::models::input::ListParams;
use crate::models::job_application::{
    JobApplicationFilter, JobApplicationStats, JobTitleCount, NewJobApplication,
};
use crate::models::lead::LeadUpdate;
use crate::models::stats::{JobApplicationSummary, status_counts};
use crate::models::{JobApplication, StoredFile};

const TABLE: &str = "site.job_applications";

const COLUMNS: &str = "id, name, email, phone, job_title, experience, cover_letter, resume, \
                       status, admin_notes, reviewed_by, reviewed_at, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["name", "email", "phone", "experience", "cover_letter"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
    ("jobTitle", "job_title"),
    ("status", "status"),
];

/// How many job titles the stats endpoint reports.
const TOP_JOB_TITLES: i64 = 10;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct JobApplicationRow {
    id: JobApplicationId,
    name: String,
    email: String,
    phone: String,
    job_title: String,
    experience: String,
    cover_letter: String,
    resume: Option<Json<StoredFile>>,
    status: JobApplicationStatus,
    admin_notes: String,
    reviewed_by: Option<AdminId>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<JobApplicationRow> for JobApplication {
    fn from(row: JobApplicationRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            job_title: row.job_title,
            experience: row.experience,
            cover_letter: row.cover_letter,
            resume: row.resume.map(|Json(file)| file),
            status: row.status,
            admin_notes: row.admin_notes,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for job applications.
pub struct JobApplicationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> JobApplicationRepository<'a> {
    /// Create a new job application repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new application with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        application: &NewJobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let row: JobApplicationRow = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE} (name, email, phone, job_title, experience, cover_letter, resume)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&application.name)
        .bind(&application.email)
        .bind(&application.phone)
        .bind(&application.job_title)
        .bind(&application.experience)
        .bind(&application.cover_letter)
        .bind(application.resume.as_ref().map(Json))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get an application by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: JobApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        let row: Option<JobApplicationRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// List applications matching the search, filters and date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        range: DateRange,
        filter: &JobApplicationFilter,
    ) -> Result<Page<JobApplication>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);
        let status = filter.status;
        let job_title = filter.job_title.clone();

        let page: Page<JobApplicationRow> = fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_eq(qb, "status", status);
                push_contains(qb, "job_title", job_title.as_deref());
                push_date_range(qb, range);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await?;

        Ok(page.map(Into::into))
    }

    /// Apply a triage update. Moving out of `new` records the reviewer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the application does not exist.
    pub async fn update(
        &self,
        id: JobApplicationId,
        update: &LeadUpdate<JobApplicationStatus>,
        admin_id: AdminId,
    ) -> Result<JobApplication, RepositoryError> {
        let stamp = update.status.is_some_and(TriageStatus::marks_review);

        let row: Option<JobApplicationRow> = sqlx::query_as(&format!(
            r"
            UPDATE {TABLE}
            SET status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes),
                reviewed_by = CASE WHEN $4 THEN $5 ELSE reviewed_by END,
                reviewed_at = CASE WHEN $4 THEN NOW() ELSE reviewed_at END
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.status)
        .bind(&update.admin_notes)
        .bind(stamp)
        .bind(admin_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an application, returning it so the caller can remove the resume.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the application does not exist.
    pub async fn delete(&self, id: JobApplicationId) -> Result<JobApplication, RepositoryError> {
        let row: Option<JobApplicationRow> = sqlx::query_as(&format!(
            "DELETE FROM {TABLE} WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Totals, recent count, per-status counts and the most applied-for titles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<JobApplicationStats, RepositoryError> {
        let (total_applications, recent_applications): (i64, i64) = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days')
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        let by_status: Vec<(JobApplicationStatus, i64)> =
            sqlx::query_as(&format!("SELECT status, COUNT(*) FROM {TABLE} GROUP BY status"))
                .fetch_all(self.pool)
                .await?;

        let job_title_stats: Vec<JobTitleCount> = sqlx::query_as(&format!(
            r"
            SELECT job_title, COUNT(*) AS count
            FROM {TABLE}
            GROUP BY job_title
            ORDER BY count DESC, job_title
            LIMIT $1
            "
        ))
        .bind(TOP_JOB_TITLES)
        .fetch_all(self.pool)
        .await?;

        Ok(JobApplicationStats {
            total_applications,
            recent_applications,
            status_counts: status_counts(by_status),
            job_title_stats,
        })
    }

    /// Dashboard counts per status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<JobApplicationSummary, RepositoryError> {
        let summary: JobApplicationSummary = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'new') AS new,
                   COUNT(*) FILTER (WHERE status = 'reviewed') AS reviewed,
                   COUNT(*) FILTER (WHERE status = 'shortlisted') AS shortlisted,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                   COUNT(*) FILTER (WHERE status = 'hired') AS hired
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(summary.with_rates())
    }
}
