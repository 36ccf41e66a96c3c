//! Product and service repository.
//!
//! One implementation parameterised by [`CatalogKind`]; the table and the
//! name of the selling-point column come from the kind.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use corpsite_core::Page;

use super::RepositoryError;
use super::query::{Sort, fetch_page, push_eq, push_search};
use crate::models::catalog::CatalogFields;
use crate::models::input::{ActiveFilter, ListParams};
use crate::models::stats::ActiveCounts;
use crate::models::{CatalogItem, CatalogKind, StoredFile};

const SEARCH_COLUMNS: &[&str] = &["title"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("title", "title"),
];

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    id: i32,
    title: String,
    description: String,
    points: Vec<String>,
    image: Option<Json<StoredFile>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<K: CatalogKind> From<CatalogRow> for CatalogItem<K> {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: K::Id::from(row.id),
            title: row.title,
            description: row.description,
            points: row.points,
            image: row.image.map(|Json(file)| file),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row returned by an update, with the image it replaced.
#[derive(Debug, sqlx::FromRow)]
struct UpdatedRow {
    #[sqlx(flatten)]
    row: CatalogRow,
    previous_image: Option<Json<StoredFile>>,
}

/// `SELECT` list aliasing the kind's list column to `points`.
fn columns<K: CatalogKind>() -> String {
    format!(
        "id, title, description, {} AS points, image, is_active, created_at, updated_at",
        K::LIST_FIELD
    )
}

fn raw_id<K: CatalogKind>(id: K::Id) -> i32 {
    id.into()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one catalogue kind.
pub struct CatalogRepository<'a, K> {
    pool: &'a PgPool,
    kind: PhantomData<K>,
}

impl<'a, K: CatalogKind> CatalogRepository<'a, K> {
    /// Create a new catalogue repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }

    /// Insert an entry. Missing `is_active` defaults to true.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: &CatalogFields<K>) -> Result<CatalogItem<K>, RepositoryError> {
        let row: CatalogRow = sqlx::query_as(&format!(
            r"
            INSERT INTO {table} (title, description, {list}, is_active, image)
            VALUES ($1, $2, COALESCE($3, '{{}}'::text[]), COALESCE($4, TRUE), $5)
            RETURNING {columns}
            ",
            table = K::TABLE,
            list = K::LIST_FIELD,
            columns = columns::<K>(),
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.points)
        .bind(fields.is_active)
        .bind(fields.image.as_ref().map(Json))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: K::Id) -> Result<Option<CatalogItem<K>>, RepositoryError> {
        let row: Option<CatalogRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE id = $1",
            columns::<K>(),
            K::TABLE
        ))
        .bind(raw_id::<K>(id))
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List entries matching the title search and visibility filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        filter: ActiveFilter,
    ) -> Result<Page<CatalogItem<K>>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);

        let page: Page<CatalogRow> = fetch_page(
            self.pool,
            K::TABLE,
            &columns::<K>(),
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_eq(qb, "is_active", filter.is_active);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await?;

        Ok(page.map(Into::into))
    }

    /// Active entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<CatalogItem<K>>, RepositoryError> {
        let rows: Vec<CatalogRow> = sqlx::query_as(&format!(
            "SELECT {} FROM {} WHERE is_active ORDER BY created_at DESC, id DESC",
            columns::<K>(),
            K::TABLE
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a partial update.
    ///
    /// Returns the updated entry and, when `fields.image` replaced one, the
    /// previous image so the caller can remove the file.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry does not exist.
    pub async fn update(
        &self,
        id: K::Id,
        fields: &CatalogFields<K>,
    ) -> Result<(CatalogItem<K>, Option<StoredFile>), RepositoryError> {
        let updated: Option<UpdatedRow> = sqlx::query_as(&format!(
            r"
            WITH old AS (SELECT image AS previous_image FROM {table} WHERE id = $1 FOR UPDATE)
            UPDATE {table}
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                {list} = COALESCE($4, {list}),
                is_active = COALESCE($5, is_active),
                image = COALESCE($6, image)
            FROM old
            WHERE id = $1
            RETURNING {columns}, old.previous_image
            ",
            table = K::TABLE,
            list = K::LIST_FIELD,
            columns = columns::<K>(),
        ))
        .bind(raw_id::<K>(id))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.points)
        .bind(fields.is_active)
        .bind(fields.image.as_ref().map(Json))
        .fetch_optional(self.pool)
        .await?;

        let UpdatedRow {
            row,
            previous_image,
        } = updated.ok_or(RepositoryError::NotFound)?;

        let replaced = fields
            .image
            .as_ref()
            .and(previous_image)
            .map(|Json(file)| file);
        Ok((row.into(), replaced))
    }

    /// Flip `is_active` in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry does not exist.
    pub async fn toggle_active(&self, id: K::Id) -> Result<CatalogItem<K>, RepositoryError> {
        let row: Option<CatalogRow> = sqlx::query_as(&format!(
            "UPDATE {} SET is_active = NOT is_active WHERE id = $1 RETURNING {}",
            K::TABLE,
            columns::<K>()
        ))
        .bind(raw_id::<K>(id))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete an entry, returning it so the caller can remove the image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry does not exist.
    pub async fn delete(&self, id: K::Id) -> Result<CatalogItem<K>, RepositoryError> {
        let row: Option<CatalogRow> = sqlx::query_as(&format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            K::TABLE,
            columns::<K>()
        ))
        .bind(raw_id::<K>(id))
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
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
            FROM {}
            ",
            K::TABLE
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProductKind, ServiceKind};

    #[test]
    fn test_columns_alias_list_field() {
        assert!(columns::<ProductKind>().contains("benefits AS points"));
        assert!(columns::<ServiceKind>().contains("features AS points"));
    }
}
