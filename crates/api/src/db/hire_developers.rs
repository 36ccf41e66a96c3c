//! Hire-a-developer enquiry repository.

use std::collections::BTreeMap;

use sqlx::PgPool;

use corpsite_core::{AdminId, HireDeveloperId, HireDeveloperStatus, Page, TriageStatus};

use super::RepositoryError;
use super::query::{
    DateRange, Sort, fetch_page, push_contains, push_date_range, push_eq, push_search,
};
use crate::models::HireDeveloper;
use crate::models::hire_developer::{HireDeveloperFilter, HireDeveloperUpdate, NewHireDeveloper};
use crate::models::input::ListParams;
use crate::models::stats::{HireDeveloperSummary, status_counts};

const TABLE: &str = "site.hire_developers";

const COLUMNS: &str = "id, name, email, phone, company, technology, budget_min, budget_max, \
                       timeline, developers_needed, engagement_type, status, admin_notes, \
                       reviewed_by, reviewed_at, quoted_amount, quoted_at, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["name", "email", "company", "phone"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
    ("company", "company"),
    ("budgetMin", "budget_min"),
    ("budgetMax", "budget_max"),
    ("status", "status"),
];

/// Repository for staffing enquiries.
pub struct HireDeveloperRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> HireDeveloperRepository<'a> {
    /// Create a new enquiry repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new enquiry with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, enquiry: &NewHireDeveloper) -> Result<HireDeveloper, RepositoryError> {
        let created = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE}
                (name, email, phone, company, technology, budget_min, budget_max,
                 timeline, developers_needed, engagement_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&enquiry.name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone)
        .bind(&enquiry.company)
        .bind(&enquiry.technology)
        .bind(enquiry.budget_min)
        .bind(enquiry.budget_max)
        .bind(&enquiry.timeline)
        .bind(&enquiry.developers_needed)
        .bind(&enquiry.engagement_type)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Get an enquiry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: HireDeveloperId,
    ) -> Result<Option<HireDeveloper>, RepositoryError> {
        let enquiry = sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(enquiry)
    }

    /// List enquiries matching the search, filters and date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        range: DateRange,
        filter: &HireDeveloperFilter,
    ) -> Result<Page<HireDeveloper>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);
        let status = filter.status;
        let technology = filter.technology.clone();

        fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_eq(qb, "status", status);
                push_contains(qb, "technology", technology.as_deref());
                push_date_range(qb, range);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await
    }

    /// Per-status counts over every enquiry, every status present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn status_counts(&self) -> Result<BTreeMap<&'static str, i64>, RepositoryError> {
        let by_status: Vec<(HireDeveloperStatus, i64)> =
            sqlx::query_as(&format!("SELECT status, COUNT(*) FROM {TABLE} GROUP BY status"))
                .fetch_all(self.pool)
                .await?;

        Ok(status_counts(by_status))
    }

    /// Apply a triage update.
    ///
    /// Moving out of `new` records the reviewer; a quoted amount records
    /// when the quote was given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the enquiry does not exist.
    pub async fn update(
        &self,
        id: HireDeveloperId,
        update: &HireDeveloperUpdate,
        admin_id: AdminId,
    ) -> Result<HireDeveloper, RepositoryError> {
        let stamp = update.status.is_some_and(TriageStatus::marks_review);

        let enquiry: Option<HireDeveloper> = sqlx::query_as(&format!(
            r"
            UPDATE {TABLE}
            SET status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes),
                reviewed_by = CASE WHEN $4 THEN $5 ELSE reviewed_by END,
                reviewed_at = CASE WHEN $4 THEN NOW() ELSE reviewed_at END,
                quoted_amount = COALESCE($6, quoted_amount),
                quoted_at = CASE WHEN $6 IS NOT NULL THEN NOW() ELSE quoted_at END
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.status)
        .bind(&update.admin_notes)
        .bind(stamp)
        .bind(admin_id)
        .bind(update.quoted_amount)
        .fetch_optional(self.pool)
        .await?;

        enquiry.ok_or(RepositoryError::NotFound)
    }

    /// Delete an enquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the enquiry does not exist.
    pub async fn delete(&self, id: HireDeveloperId) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Counts per status plus the acceptance rate.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<HireDeveloperSummary, RepositoryError> {
        let summary: HireDeveloperSummary = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'new') AS new,
                   COUNT(*) FILTER (WHERE status = 'reviewed') AS reviewed,
                   COUNT(*) FILTER (WHERE status = 'quoted') AS quoted,
                   COUNT(*) FILTER (WHERE status = 'negotiating') AS negotiating,
                   COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(summary.with_rates())
    }
}
