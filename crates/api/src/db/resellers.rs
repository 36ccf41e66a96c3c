//! Reseller enquiry repository.

use sqlx::PgPool;

use corpsite_core::{Page, ResellerId};

use super::RepositoryError;
use super::query::{DateRange, Sort, fetch_page, push_date_range, push_search};
use crate::models::Reseller;
use crate::models::input::ListParams;
use crate::models::reseller::NewReseller;

const TABLE: &str = "site.resellers";

const COLUMNS: &str =
    "id, name, mobile, email, business_category, state, city, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["name", "email", "mobile", "business_category", "city", "state"];

const SORTABLE: &[(&str, &str)] = &[("createdAt", "created_at"), ("name", "name")];

/// Repository for reseller enquiries.
pub struct ResellerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResellerRepository<'a> {
    /// Create a new reseller repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new enquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, reseller: &NewReseller) -> Result<Reseller, RepositoryError> {
        let created = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE} (name, mobile, email, business_category, state, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&reseller.name)
        .bind(&reseller.mobile)
        .bind(&reseller.email)
        .bind(&reseller.business_category)
        .bind(&reseller.state)
        .bind(&reseller.city)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    /// Get an enquiry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ResellerId) -> Result<Option<Reseller>, RepositoryError> {
        let reseller = sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(reseller)
    }

    /// List enquiries matching the search and date range.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        range: DateRange,
    ) -> Result<Page<Reseller>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);

        fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_date_range(qb, range);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await
    }

    /// Delete an enquiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the enquiry does not exist.
    pub async fn delete(&self, id: ResellerId) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
