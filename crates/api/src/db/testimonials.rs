//! Testimonial repository.

use sqlx::PgPool;

use corpsite_core::{Page, TestimonialId};

use super::RepositoryError;
use super::query::{Sort, fetch_page, push_eq, push_search};
use crate::models::Testimonial;
use crate::models::input::{ActiveFilter, ListParams};
use crate::models::stats::ActiveCounts;
use crate::models::testimonial::{PublicTestimonial, TestimonialFields};

const TABLE: &str = "site.testimonials";

const COLUMNS: &str = "id, quote, name, title, is_active, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["quote", "name", "title"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("name", "name"),
];

/// Repository for testimonials.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    /// Create a new testimonial repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a testimonial. Missing `is_active` defaults to true.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: &TestimonialFields) -> Result<Testimonial, RepositoryError> {
        let created = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE} (quote, name, title, is_active)
            VALUES ($1, $2, $3, COALESCE($4, TRUE))
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.quote)
        .bind(&fields.name)
        .bind(&fields.title)
        .bind(fields.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Get a testimonial by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: TestimonialId) -> Result<Option<Testimonial>, RepositoryError> {
        let testimonial = sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(testimonial)
    }

    /// List testimonials for the admin console.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        filter: ActiveFilter,
    ) -> Result<Page<Testimonial>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);

        fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_eq(qb, "is_active", filter.is_active);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await
    }

    /// Active testimonials, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_public(&self) -> Result<Vec<PublicTestimonial>, RepositoryError> {
        let testimonials = sqlx::query_as(&format!(
            r"
            SELECT id, quote, name, title, created_at
            FROM {TABLE}
            WHERE is_active
            ORDER BY created_at DESC, id DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(testimonials)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial does not exist.
    pub async fn update(
        &self,
        id: TestimonialId,
        fields: &TestimonialFields,
    ) -> Result<Testimonial, RepositoryError> {
        let testimonial: Option<Testimonial> = sqlx::query_as(&format!(
            r"
            UPDATE {TABLE}
            SET quote = COALESCE($2, quote),
                name = COALESCE($3, name),
                title = COALESCE($4, title),
                is_active = COALESCE($5, is_active)
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.quote)
        .bind(&fields.name)
        .bind(&fields.title)
        .bind(fields.is_active)
        .fetch_optional(self.pool)
        .await?;

        testimonial.ok_or(RepositoryError::NotFound)
    }

    /// Flip `is_active` in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial does not exist.
    pub async fn toggle_active(&self, id: TestimonialId) -> Result<Testimonial, RepositoryError> {
        let testimonial: Option<Testimonial> = sqlx::query_as(&format!(
            "UPDATE {TABLE} SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        testimonial.ok_or(RepositoryError::NotFound)
    }

    /// Delete a testimonial.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the testimonial does not exist.
    pub async fn delete(&self, id: TestimonialId) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Total, active and inactive counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn counts(&self) -> Result<ActiveCounts, RepositoryError> {
        let counts = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active,
                   COUNT(*) FILTER (WHERE NOT is_active) AS inactive
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
