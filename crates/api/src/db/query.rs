//! Dynamic list queries shared by the repositories.
//!
//! List endpoints combine optional filters, a whitelisted sort and
//! `LIMIT`/`OFFSET` paging. Filters are pushed onto a [`QueryBuilder`] whose
//! SQL already ends in `WHERE TRUE`, so each one appends ` AND …`.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use corpsite_core::{Page, PageRequest};

use super::RepositoryError;
use crate::models::input::{ListParams, SortOrder};

/// Inclusive `created_at` bounds.
pub type DateRange = (Option<DateTime<Utc>>, Option<DateTime<Utc>>);

/// Column used when the client names no sort key, or an unknown one.
const DEFAULT_SORT_COLUMN: &str = "created_at";

/// A resolved `ORDER BY` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    column: &'static str,
    order: SortOrder,
}

impl Sort {
    /// Map a client sort key to a column through `allowed`
    /// (`(camelCaseKey, column)` pairs).
    #[must_use]
    pub fn resolve(
        allowed: &[(&str, &'static str)],
        key: Option<&str>,
        order: SortOrder,
    ) -> Self {
        let column = key
            .map(str::trim)
            .and_then(|key| allowed.iter().find(|(k, _)| *k == key))
            .map_or(DEFAULT_SORT_COLUMN, |(_, column)| *column);
        Self { column, order }
    }

    /// Resolve from list parameters.
    #[must_use]
    pub fn from_params(allowed: &[(&str, &'static str)], params: &ListParams) -> Self {
        Self::resolve(allowed, params.sort_by.as_deref(), params.sort_order)
    }

    /// `ORDER BY` body, with `id` as a tiebreaker so pages are stable.
    fn clause(self) -> String {
        let dir = self.order.as_sql();
        format!("{} {dir}, id {dir}", self.column)
    }
}

/// Escape `LIKE` wildcards and wrap the term for substring matching.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// ` AND (c1 ILIKE $n OR c2 ILIKE $m …)` for a non-blank search term.
pub fn push_search(qb: &mut QueryBuilder<'_, Postgres>, columns: &[&str], term: Option<&str>) {
    let Some(term) = term.map(str::trim).filter(|t| !t.is_empty()) else {
        return;
    };
    let pattern = like_pattern(term);
    qb.push(" AND (");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
    }
    qb.push(")");
}

/// ` AND column ILIKE '%value%'` for a non-blank value.
pub fn push_contains(qb: &mut QueryBuilder<'_, Postgres>, column: &str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
        qb.push(" AND ")
            .push(column)
            .push(" ILIKE ")
            .push_bind(like_pattern(value));
    }
}

/// ` AND column = $n` when a value is given.
pub fn push_eq<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &str, value: Option<T>)
where
    T: 'args + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

/// Inclusive `created_at` bounds.
pub fn push_date_range(qb: &mut QueryBuilder<'_, Postgres>, (start, end): DateRange) {
    if let Some(start) = start {
        qb.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND created_at <= ").push_bind(end);
    }
}

/// Count the matching rows, then fetch one sorted page of them.
///
/// `filters` runs once per statement so both see the same conditions; it
/// must bind owned values.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if either query fails.
pub async fn fetch_page<Row>(
    pool: &PgPool,
    table: &str,
    columns: &str,
    filters: impl Fn(&mut QueryBuilder<'_, Postgres>),
    sort: Sort,
    page: PageRequest,
) -> Result<Page<Row>, RepositoryError>
where
    Row: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut count = QueryBuilder::new(format!("SELECT COUNT(*) FROM {table} WHERE TRUE"));
    filters(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::new(format!("SELECT {columns} FROM {table} WHERE TRUE"));
    filters(&mut select);
    push_order_and_page(&mut select, sort, page);
    let rows: Vec<Row> = select.build_query_as().fetch_all(pool).await?;

    Ok(Page::new(rows, page, total))
}

fn push_order_and_page(qb: &mut QueryBuilder<'_, Postgres>, sort: Sort, page: PageRequest) {
    qb.push(" ORDER BY ")
        .push(sort.clause())
        .push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(page.offset());
}

/// Whether a sqlx error is a unique-constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e
        && db_err.is_unique_violation()
    {
        return true;
    }
    false
}
