//! Admin account repository.
//!
//! Implements [`AdminStore`] so the auth services run against `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use corpsite_core::{AdminId, Email};

use super::RepositoryError;
use super::query::is_unique_violation;
use crate::models::{Admin, AdminCredentials, NewAdmin, ProfileChanges};
use crate::services::auth::AdminStore;

const ADMIN_COLUMNS: &str = "id, email, mobile, avatar, created_at, updated_at";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` admin queries.
#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    email: String,
    mobile: String,
    avatar: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminRow> for Admin {
    type Error = RepositoryError;

    fn try_from(row: AdminRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: AdminId::new(row.id),
            email,
            mobile: row.mobile,
            avatar: row.avatar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Admin row plus its password hash.
#[derive(Debug, sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    admin: AdminRow,
    password_hash: String,
}

impl TryFrom<CredentialsRow> for AdminCredentials {
    type Error = RepositoryError;

    fn try_from(row: CredentialsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            admin: row.admin.try_into()?,
            password_hash: row.password_hash,
        })
    }
}

fn email_conflict(e: sqlx::Error) -> RepositoryError {
    if is_unique_violation(&e) {
        return RepositoryError::Conflict("email already exists".to_owned());
    }
    RepositoryError::Database(e)
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for admin account operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count admin accounts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM site.admins")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AdminStore for AdminRepository<'_> {
    async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let row: Option<AdminRow> =
            sqlx::query_as(&format!("SELECT {ADMIN_COLUMNS} FROM site.admins WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row: Option<CredentialsRow> = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS}, password_hash FROM site.admins WHERE email = lower($1)"
        ))
        .bind(email.trim())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn find_credentials_by_id(
        &self,
        id: AdminId,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row: Option<CredentialsRow> = sqlx::query_as(&format!(
            "SELECT {ADMIN_COLUMNS}, password_hash FROM site.admins WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let row: AdminRow = sqlx::query_as(&format!(
            r"
            INSERT INTO site.admins (email, mobile, password_hash, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(admin.email.as_str())
        .bind(&admin.mobile)
        .bind(&admin.password_hash)
        .bind(&admin.avatar)
        .fetch_one(self.pool)
        .await
        .map_err(email_conflict)?;

        row.try_into()
    }

    async fn update_profile(
        &self,
        id: AdminId,
        changes: &ProfileChanges,
    ) -> Result<Admin, RepositoryError> {
        let row: Option<AdminRow> = sqlx::query_as(&format!(
            r"
            UPDATE site.admins
            SET email = COALESCE($2, email),
                mobile = COALESCE($3, mobile),
                avatar = COALESCE($4, avatar)
            WHERE id = $1
            RETURNING {ADMIN_COLUMNS}
            "
        ))
        .bind(id)
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(&changes.mobile)
        .bind(&changes.avatar)
        .fetch_optional(self.pool)
        .await
        .map_err(email_conflict)?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    async fn set_password_hash(&self, id: AdminId, hash: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE site.admins SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn refresh_token(&self, id: AdminId) -> Result<Option<String>, RepositoryError> {
        let token: Option<Option<String>> =
            sqlx::query_scalar("SELECT refresh_token FROM site.admins WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        token.ok_or(RepositoryError::NotFound)
    }

    async fn set_refresh_token(
        &self,
        id: AdminId,
        token: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE site.admins SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(token)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        id: AdminId,
        expected: &str,
        new: &str,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE site.admins SET refresh_token = $3 WHERE id = $1 AND refresh_token = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
