//! Open position repository.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use corpsite_core::{AdminId, Currency, JobType, OpenPositionId, Page};

use super::RepositoryError;
use super::query::{Sort, fetch_page, push_contains, push_eq, push_search};
use crate::models::OpenPosition;
use crate::models::input::ListParams;
use crate::models::open_position::{
    DepartmentCount, JobTypeCount, OpenPositionFields, OpenPositionFilter, OpenPositionStats,
    PublicPositionQuery, Salary,
};
use crate::models::stats::{ActiveCounts, OpenPositionSummary};

const TABLE: &str = "site.open_positions";

const COLUMNS: &str = "id, title, department, location, job_type, experience, description, \
                       requirements, responsibilities, benefits, salary_min, salary_max, \
                       salary_currency, is_active, is_remote, application_deadline, posted_by, \
                       tags, priority, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["title", "description", "department"];

const SORTABLE: &[(&str, &str)] = &[
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("title", "title"),
    ("priority", "priority"),
    ("applicationDeadline", "application_deadline"),
];

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OpenPositionRow {
    id: OpenPositionId,
    title: String,
    department: String,
    location: String,
    job_type: JobType,
    experience: String,
    description: String,
    requirements: Vec<String>,
    responsibilities: Vec<String>,
    benefits: Vec<String>,
    salary_min: Option<Decimal>,
    salary_max: Option<Decimal>,
    salary_currency: Currency,
    is_active: bool,
    is_remote: bool,
    application_deadline: Option<DateTime<Utc>>,
    posted_by: AdminId,
    tags: Vec<String>,
    priority: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OpenPositionRow> for OpenPosition {
    fn from(row: OpenPositionRow) -> Self {
        let salary = Salary {
            min: row.salary_min,
            max: row.salary_max,
            currency: row.salary_currency,
        };
        Self {
            id: row.id,
            title: row.title,
            department: row.department,
            location: row.location,
            job_type: row.job_type,
            experience: row.experience,
            description: row.description,
            requirements: row.requirements,
            responsibilities: row.responsibilities,
            benefits: row.benefits,
            salary_range: salary.range_label(),
            salary,
            is_accepting_applications: Self::accepts_applications_at(
                row.is_active,
                row.application_deadline,
                Utc::now(),
            ),
            is_active: row.is_active,
            is_remote: row.is_remote,
            application_deadline: row.application_deadline,
            posted_by: row.posted_by,
            tags: row.tags,
            priority: row.priority,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_position_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    department: Option<&str>,
    location: Option<&str>,
    job_type: Option<JobType>,
) {
    push_contains(qb, "department", department);
    push_contains(qb, "location", location);
    push_eq(qb, "job_type", job_type);
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for job openings.
pub struct OpenPositionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OpenPositionRepository<'a> {
    /// Create a new open position repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a position posted by `admin_id`.
    ///
    /// `fields` must come from `OpenPositionDraft::validate_new`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        fields: &OpenPositionFields,
        admin_id: AdminId,
    ) -> Result<OpenPosition, RepositoryError> {
        let salary = fields.salary.unwrap_or_default();

        let row: OpenPositionRow = sqlx::query_as(&format!(
            r"
            INSERT INTO {TABLE}
                (title, department, location, job_type, experience, description,
                 requirements, responsibilities, benefits, tags,
                 salary_min, salary_max, salary_currency,
                 is_active, is_remote, application_deadline, priority, posted_by)
            VALUES ($1, $2, $3, $4, $5, $6,
                    $7, COALESCE($8, '{{}}'::text[]), COALESCE($9, '{{}}'::text[]),
                    COALESCE($10, '{{}}'::text[]),
                    $11, $12, $13,
                    COALESCE($14, TRUE), COALESCE($15, FALSE), $16, COALESCE($17, 0), $18)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&fields.title)
        .bind(&fields.department)
        .bind(&fields.location)
        .bind(fields.job_type)
        .bind(&fields.experience)
        .bind(&fields.description)
        .bind(&fields.requirements)
        .bind(&fields.responsibilities)
        .bind(&fields.benefits)
        .bind(&fields.tags)
        .bind(salary.min)
        .bind(salary.max)
        .bind(salary.currency)
        .bind(fields.is_active)
        .bind(fields.is_remote)
        .bind(fields.application_deadline)
        .bind(fields.priority)
        .bind(admin_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a position by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: OpenPositionId,
    ) -> Result<Option<OpenPosition>, RepositoryError> {
        let row: Option<OpenPositionRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// List positions for the admin console.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        params: &ListParams,
        filter: &OpenPositionFilter,
    ) -> Result<Page<OpenPosition>, RepositoryError> {
        let search = params.search_term().map(str::to_owned);
        let department = filter.department.clone();
        let location = filter.location.clone();
        let job_type = filter.job_type;
        let is_active = filter.is_active;

        let page: Page<OpenPositionRow> = fetch_page(
            self.pool,
            TABLE,
            COLUMNS,
            |qb| {
                push_search(qb, SEARCH_COLUMNS, search.as_deref());
                push_position_filters(qb, department.as_deref(), location.as_deref(), job_type);
                push_eq(qb, "is_active", is_active);
            },
            Sort::from_params(SORTABLE, params),
            params.page_request(),
        )
        .await?;

        Ok(page.map(Into::into))
    }

    /// Active positions for the careers page, highest priority then newest.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_public(
        &self,
        query: &PublicPositionQuery,
    ) -> Result<Vec<OpenPosition>, RepositoryError> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM {TABLE} WHERE is_active"));
        push_position_filters(
            &mut qb,
            query.department.as_deref(),
            query.location.as_deref(),
            query.job_type,
        );
        push_search(&mut qb, SEARCH_COLUMNS, query.search.as_deref());
        qb.push(" ORDER BY priority DESC, created_at DESC, id DESC");

        let rows: Vec<OpenPositionRow> = qb.build_query_as().fetch_all(self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Apply a partial update. A salary replaces the whole band.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn update(
        &self,
        id: OpenPositionId,
        fields: &OpenPositionFields,
    ) -> Result<OpenPosition, RepositoryError> {
        let salary = fields.salary;

        let row: Option<OpenPositionRow> = sqlx::query_as(&format!(
            r"
            UPDATE {TABLE}
            SET title = COALESCE($2, title),
                department = COALESCE($3, department),
                location = COALESCE($4, location),
                job_type = COALESCE($5, job_type),
                experience = COALESCE($6, experience),
                description = COALESCE($7, description),
                requirements = COALESCE($8, requirements),
                responsibilities = COALESCE($9, responsibilities),
                benefits = COALESCE($10, benefits),
                tags = COALESCE($11, tags),
                salary_min = CASE WHEN $12 THEN $13 ELSE salary_min END,
                salary_max = CASE WHEN $12 THEN $14 ELSE salary_max END,
                salary_currency = CASE WHEN $12 THEN $15 ELSE salary_currency END,
                is_active = COALESCE($16, is_active),
                is_remote = COALESCE($17, is_remote),
                application_deadline = COALESCE($18, application_deadline),
                priority = COALESCE($19, priority)
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.department)
        .bind(&fields.location)
        .bind(fields.job_type)
        .bind(&fields.experience)
        .bind(&fields.description)
        .bind(&fields.requirements)
        .bind(&fields.responsibilities)
        .bind(&fields.benefits)
        .bind(&fields.tags)
        .bind(salary.is_some())
        .bind(salary.and_then(|s| s.min))
        .bind(salary.and_then(|s| s.max))
        .bind(salary.map(|s| s.currency))
        .bind(fields.is_active)
        .bind(fields.is_remote)
        .bind(fields.application_deadline)
        .bind(fields.priority)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Flip `is_active` in one statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn toggle_active(&self, id: OpenPositionId) -> Result<OpenPosition, RepositoryError> {
        let row: Option<OpenPositionRow> = sqlx::query_as(&format!(
            "UPDATE {TABLE} SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Delete a position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the position does not exist.
    pub async fn delete(&self, id: OpenPositionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE} WHERE id = $1"))
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Visibility overview plus department and type breakdowns of active
    /// positions, largest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<OpenPositionStats, RepositoryError> {
        let overview: ActiveCounts = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active,
                   COUNT(*) FILTER (WHERE NOT is_active) AS inactive
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        let by_department: Vec<DepartmentCount> = sqlx::query_as(&format!(
            r"
            SELECT department, COUNT(*) AS count
            FROM {TABLE}
            WHERE is_active
            GROUP BY department
            ORDER BY count DESC, department
            "
        ))
        .fetch_all(self.pool)
        .await?;

        let by_type: Vec<JobTypeCount> = sqlx::query_as(&format!(
            r#"
            SELECT job_type AS "type", COUNT(*) AS count
            FROM {TABLE}
            WHERE is_active
            GROUP BY job_type
            ORDER BY count DESC, job_type
            "#
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(OpenPositionStats {
            overview,
            by_department,
            by_type,
        })
    }

    /// Dashboard counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(&self) -> Result<OpenPositionSummary, RepositoryError> {
        let summary = sqlx::query_as(&format!(
            r"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_active) AS active,
                   COUNT(*) FILTER (WHERE NOT is_active) AS inactive,
                   COUNT(*) FILTER (WHERE is_remote) AS remote,
                   COUNT(*) FILTER (WHERE NOT is_remote) AS on_site
            FROM {TABLE}
            "
        ))
        .fetch_one(self.pool)
        .await?;

        Ok(summary)
    }
}
