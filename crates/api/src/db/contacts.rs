//! Contact form repository.

use sqlx::PgPool;

use corpsite_core::{AdminId, ContactId, ContactStatus, Page, TriageStatus};

use super::RepositoryError;
use super::query::{DateRange, Sort, fetch_page, push_date_range, push_eq, push_search};
use crate::models::contact::{ContactFilter, ContactStats, NewContact};
use crate::models::input::ListParams;
use crate::models::lead::LeadUpdate;
use crate::models::stats::{ContactSummary, status_counts};
use crate::models::Contact;

const TABLE: &str = "site.contacts";

const COLUMNS: &str = "id, name, email, country_code, phone, message, status, admin_notes, \
                       responded_by, responded_at, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["name", "email", "phone", "message"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
    ("email", "email"),
    ("status", "status"),
];

/// Repository for contact submissions.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new submission with status `new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, contact: &NewContact) -> Result<Contact, RepositoryError> {
        let created = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE} (name, email, country_code, phone, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.country_code)
        .bind(&contact.phone)
        .bind(&contact.message)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Get a contact by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        let contact = sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(contact)
    }

    /// List contacts matching the search, filters and date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        range: DateRange,
        filter: &ContactFilter,
    ) -> Result<Page<Contact>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);
        let status = filter.status;

        fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_eq(qb, "status", status);
                push_date_range(qb, range);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await
    }

    /// Apply a triage update. Moving out of `new` records who responded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact does not exist.
    pub async fn update(
        &self,
        id: ContactId,
        update: &LeadUpdate<ContactStatus>,
        admin_id: AdminId,
    ) -> Result<Contact, RepositoryError> {
        let stamp = update.status.is_some_and(TriageStatus::marks_review);

        let contact: Option<Contact> = sqlx::query_as(&format!(
            r"
            UPDATE {TABLE}
            SET status = COALESCE($2, status),
                admin_notes = COALESCE($3, admin_notes),
                responded_by = CASE WHEN $4 THEN $5 ELSE responded_by END,
                responded_at = CASE WHEN $4 THEN NOW() ELSE responded_at END
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

        contact.ok_or(RepositoryError::NotFound)
    }

    /// Delete a contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact does not exist.
    pub async fn delete(&self, id: ContactId) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Totals, last-seven-days count and per-status counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<ContactStats, RepositoryError> {
        let (total_contacts, recent_contacts): (i64, i64) = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days')
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        let by_status: Vec<(ContactStatus, i64)> =
            sqlx::query_as(&format!("SELECT status, COUNT(*) FROM {TABLE} GROUP BY status"))
                .fetch_all(self.pool)
                .await?;

        Ok(ContactStats {
            total_contacts,
            recent_contacts,
            status_counts: status_counts(by_status),
        })
    }

    /// Dashboard counts per status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<ContactSummary, RepositoryError> {
        let summary: ContactSummary = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'new') AS new,
                   COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                   COUNT(*) FILTER (WHERE status = 'closed') AS closed
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(summary.with_rates())
    }
}
