//! Persistence seam for admin accounts.

use async_trait::async_trait;

use corpsite_core::AdminId;

use crate::db::RepositoryError;
use crate::models::{Admin, AdminCredentials, NewAdmin, ProfileChanges};

/// Admin account storage used by the auth and token services.
#[async_trait]
pub trait AdminStore: Send + Sync {
    /// Load an admin without secret fields.
    async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError>;

    /// Load an admin and password hash by (case-insensitive) email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminCredentials>, RepositoryError>;

    /// Load an admin and password hash by ID.
    async fn find_credentials_by_id(
        &self,
        id: AdminId,
    ) -> Result<Option<AdminCredentials>, RepositoryError>;

    /// Insert an admin.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn create(&self, admin: NewAdmin) -> Result<Admin, RepositoryError>;

    /// Apply a partial profile update.
    ///
    /// Returns `RepositoryError::Conflict` if the new email is taken and
    /// `RepositoryError::NotFound` if the admin is gone.
    async fn update_profile(
        &self,
        id: AdminId,
        changes: &ProfileChanges,
    ) -> Result<Admin, RepositoryError>;

    /// Replace the password hash.
    async fn set_password_hash(&self, id: AdminId, hash: &str) -> Result<(), RepositoryError>;

    /// The stored refresh token.
    ///
    /// Returns `RepositoryError::NotFound` if the admin does not exist.
    async fn refresh_token(&self, id: AdminId) -> Result<Option<String>, RepositoryError>;

    /// Overwrite or clear the stored refresh token.
    async fn set_refresh_token(&self, id: AdminId, token: Option<&str>)
    -> Result<(), RepositoryError>;

    /// Replace the stored refresh token only if it still equals `expected`.
    ///
    /// Returns `false` when another rotation or a revoke got there first.
    async fn rotate_refresh_token(
        &self,
        id: AdminId,
        expected: &str,
        new: &str,
    ) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store for service tests.

    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Debug, Clone)]
    struct Record {
        admin: Admin,
        password_hash: String,
        refresh_token: Option<String>,
    }

    #[derive(Debug, Default)]
    pub struct MemoryAdminStore {
        records: Mutex<Vec<Record>>,
    }

    impl MemoryAdminStore {
        fn with<T>(&self, f: impl FnOnce(&mut Vec<Record>) -> T) -> T {
            let mut records = self.records.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            f(&mut records)
        }

        pub fn stored_refresh_token(&self, id: AdminId) -> Option<String> {
            self.with(|records| {
                records
                    .iter()
                    .find(|r| r.admin.id == id)
                    .and_then(|r| r.refresh_token.clone())
            })
        }

        pub fn len(&self) -> usize {
            self.with(|records| records.len())
        }
    }

    #[async_trait]
    impl AdminStore for MemoryAdminStore {
        async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
            Ok(self.with(|records| {
                records.iter().find(|r| r.admin.id == id).map(|r| r.admin.clone())
            }))
        }

        async fn find_credentials_by_email(
            &self,
            email: &str,
        ) -> Result<Option<AdminCredentials>, RepositoryError> {
            let email = email.trim().to_lowercase();
            Ok(self.with(|records| {
                records
                    .iter()
                    .find(|r| r.admin.email.as_str() == email)
                    .map(|r| AdminCredentials {
                        admin: r.admin.clone(),
                        password_hash: r.password_hash.clone(),
                    })
            }))
        }

        async fn find_credentials_by_id(
            &self,
            id: AdminId,
        ) -> Result<Option<AdminCredentials>, RepositoryError> {
            Ok(self.with(|records| {
                records.iter().find(|r| r.admin.id == id).map(|r| AdminCredentials {
                    admin: r.admin.clone(),
                    password_hash: r.password_hash.clone(),
                })
            }))
        }

        async fn create(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
            self.with(|records| {
                if records.iter().any(|r| r.admin.email == admin.email) {
                    return Err(RepositoryError::Conflict("email already exists".into()));
                }
                let id = i32::try_from(records.len()).unwrap_or(i32::MAX) + 1;
                let now = Utc::now();
                let created = Admin {
                    id: AdminId::new(id),
                    email: admin.email,
                    mobile: admin.mobile,
                    avatar: admin.avatar,
                    created_at: now,
                    updated_at: now,
                };
                records.push(Record {
                    admin: created.clone(),
                    password_hash: admin.password_hash,
                    refresh_token: None,
                });
                Ok(created)
            })
        }

        async fn update_profile(
            &self,
            id: AdminId,
            changes: &ProfileChanges,
        ) -> Result<Admin, RepositoryError> {
            self.with(|records| {
                if let Some(email) = &changes.email
                    && records.iter().any(|r| r.admin.id != id && r.admin.email == *email)
                {
                    return Err(RepositoryError::Conflict("email already exists".into()));
                }
                let record = records
                    .iter_mut()
                    .find(|r| r.admin.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                if let Some(email) = &changes.email {
                    record.admin.email = email.clone();
                }
                if let Some(mobile) = &changes.mobile {
                    record.admin.mobile.clone_from(mobile);
                }
                if let Some(avatar) = &changes.avatar {
                    record.admin.avatar = Some(avatar.clone());
                }
                record.admin.updated_at = Utc::now();
                Ok(record.admin.clone())
            })
        }

        async fn set_password_hash(&self, id: AdminId, hash: &str) -> Result<(), RepositoryError> {
            self.with(|records| {
                let record = records
                    .iter_mut()
                    .find(|r| r.admin.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                record.password_hash = hash.to_string();
                Ok(())
            })
        }

        async fn refresh_token(&self, id: AdminId) -> Result<Option<String>, RepositoryError> {
            self.with(|records| {
                records
                    .iter()
                    .find(|r| r.admin.id == id)
                    .map(|r| r.refresh_token.clone())
                    .ok_or(RepositoryError::NotFound)
            })
        }

        async fn set_refresh_token(
            &self,
            id: AdminId,
            token: Option<&str>,
        ) -> Result<(), RepositoryError> {
            self.with(|records| {
                let record = records
                    .iter_mut()
                    .find(|r| r.admin.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                record.refresh_token = token.map(str::to_string);
                Ok(())
            })
        }

        async fn rotate_refresh_token(
            &self,
            id: AdminId,
            expected: &str,
            new: &str,
        ) -> Result<bool, RepositoryError> {
            Ok(self.with(|records| {
                match records.iter_mut().find(|r| r.admin.id == id) {
                    Some(record) if record.refresh_token.as_deref() == Some(expected) => {
                        record.refresh_token = Some(new.to_string());
                        true
                    }
                    _ => false,
                }
            }))
        }
    }
}
