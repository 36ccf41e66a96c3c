//! Admin authentication service.
//!
//! Password login with Argon2id hashes, short-lived access tokens and
//! rotating single-use refresh tokens. Storage goes through [`AdminStore`]
//! so the service can run against `PostgreSQL` or an in-memory store.

mod error;
mod password;
pub(crate) mod store;
mod tokens;

pub use error::AuthError;
pub use password::{MIN_PASSWORD_LENGTH, hash_password, validate_password, verify_password};
pub use store::AdminStore;
pub use tokens::{AccessClaims, JwtKeys, RefreshClaims, TokenPair, TokenService};

use corpsite_core::AdminId;

use crate::db::RepositoryError;
use crate::models::{Admin, NewAdmin, ProfileChanges, admin::Registration};

/// Admin authentication service.
pub struct AuthService<'a, S: ?Sized> {
    store: &'a S,
    keys: &'a JwtKeys,
}

impl<'a, S: AdminStore + ?Sized> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a S, keys: &'a JwtKeys) -> Self {
        Self { store, keys }
    }

    /// Token operations sharing this service's store and keys.
    #[must_use]
    pub const fn tokens(&self) -> TokenService<'a, S> {
        TokenService::new(self.keys, self.store)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// - `AuthError::WeakPassword` if the password is too short
    /// - `AuthError::EmailTaken` if the email is already registered
    pub async fn register(
        &self,
        registration: Registration,
        avatar: Option<String>,
    ) -> Result<Admin, AuthError> {
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password)?;

        let admin = self
            .store
            .create(NewAdmin {
                email: registration.email,
                mobile: registration.mobile,
                password_hash,
                avatar,
            })
            .await
            .map_err(email_taken)?;

        tracing::info!(admin_id = %admin.id, "admin registered");
        Ok(admin)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
    /// password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(Admin, TokenPair), AuthError> {
        let Some(credentials) = self.store.find_credentials_by_email(email).await? else {
            tracing::debug!("login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &credentials.password_hash)?;

        let tokens = self.tokens().issue(credentials.admin.id).await?;
        tracing::info!(admin_id = %credentials.admin.id, "admin logged in");
        Ok((credentials.admin, tokens))
    }

    /// Revoke the admin's refresh token.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the write fails.
    pub async fn logout(&self, admin_id: AdminId) -> Result<(), AuthError> {
        self.tokens().revoke(admin_id).await
    }

    /// Rotate a refresh token.
    ///
    /// # Errors
    ///
    /// See [`TokenService::refresh`].
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, AuthError> {
        self.tokens().refresh(presented).await
    }

    /// Change the admin's password after checking the current one.
    ///
    /// # Errors
    ///
    /// - `AuthError::UserNotFound` if the admin no longer exists
    /// - `AuthError::InvalidOldPassword` if `old_password` does not match
    /// - `AuthError::WeakPassword` if `new_password` is too short
    pub async fn change_password(
        &self,
        admin_id: AdminId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let credentials = self
            .store
            .find_credentials_by_id(admin_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(old_password, &credentials.password_hash)
            .map_err(|_| AuthError::InvalidOldPassword)?;
        validate_password(new_password)?;

        let hash = hash_password(new_password)?;
        self.store
            .set_password_hash(admin_id, &hash)
            .await
            .map_err(user_not_found)?;

        tracing::info!(admin_id = %admin_id, "admin password changed");
        Ok(())
    }

    /// Apply profile changes.
    ///
    /// # Errors
    ///
    /// - `AuthError::EmailTaken` if the new email belongs to another admin
    /// - `AuthError::UserNotFound` if the admin no longer exists
    pub async fn update_profile(
        &self,
        admin_id: AdminId,
        changes: &ProfileChanges,
    ) -> Result<Admin, AuthError> {
        self.store
            .update_profile(admin_id, changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })
    }

    /// Load the admin by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the admin does not exist.
    pub async fn current(&self, admin_id: AdminId) -> Result<Admin, AuthError> {
        self.store
            .find_by_id(admin_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

fn email_taken(e: RepositoryError) -> AuthError {
    match e {
        RepositoryError::Conflict(_) => AuthError::EmailTaken,
        other => AuthError::Repository(other),
    }
}

fn user_not_found(e: RepositoryError) -> AuthError {
    match e {
        RepositoryError::NotFound => AuthError::UserNotFound,
        other => AuthError::Repository(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use corpsite_core::Email;

    use super::*;
    use crate::config::TokenConfig;
    use store::memory::MemoryAdminStore;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&TokenConfig {
            access_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6a"),
            refresh_secret: SecretString::from("Zq8!vN2@kL5#pW7$rT0*uY4^xC6&mB3b"),
            access_ttl: Duration::from_secs(60),
            refresh_ttl: Duration::from_secs(600),
        })
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: Email::parse(email).unwrap(),
            mobile: "5550100".into(),
            password: "hunter2hunter2".into(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);

        let admin = auth.register(registration("Ops@Example.com"), None).await.unwrap();
        assert_eq!(admin.email.as_str(), "ops@example.com");

        let (logged_in, pair) = auth.login("OPS@example.com", "hunter2hunter2").await.unwrap();
        assert_eq!(logged_in.id, admin.id);
        assert_eq!(keys.verify_access(&pair.access_token).unwrap(), admin.id);
        assert_eq!(store.stored_refresh_token(admin.id), Some(pair.refresh_token));
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_conflict() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);

        auth.register(registration("ops@example.com"), None).await.unwrap();
        let err = auth
            .register(registration("ops@example.com"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);
        auth.register(registration("ops@example.com"), None).await.unwrap();

        let unknown = auth.login("nobody@example.com", "hunter2hunter2").await.unwrap_err();
        let wrong = auth.login("ops@example.com", "wrong-password").await.unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_change_password() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);
        let admin = auth.register(registration("ops@example.com"), None).await.unwrap();

        let err = auth
            .change_password(admin.id, "not-the-password", "new-password-1")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOldPassword));

        auth.change_password(admin.id, "hunter2hunter2", "new-password-1")
            .await
            .unwrap();
        assert!(auth.login("ops@example.com", "hunter2hunter2").await.is_err());
        assert!(auth.login("ops@example.com", "new-password-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_revokes_refresh() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);
        let admin = auth.register(registration("ops@example.com"), None).await.unwrap();
        let (_, pair) = auth.login("ops@example.com", "hunter2hunter2").await.unwrap();

        auth.logout(admin.id).await.unwrap();
        assert!(matches!(
            auth.refresh(Some(&pair.refresh_token)).await,
            Err(AuthError::StaleRefreshToken)
        ));
    }

    #[tokio::test]
    async fn test_profile_email_conflict() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);
        auth.register(registration("a@example.com"), None).await.unwrap();
        let b = auth.register(registration("b@example.com"), None).await.unwrap();

        let changes = ProfileChanges {
            email: Some(Email::parse("a@example.com").unwrap()),
            ..ProfileChanges::default()
        };
        assert!(matches!(
            auth.update_profile(b.id, &changes).await,
            Err(AuthError::EmailTaken)
        ));

        let changes = ProfileChanges {
            mobile: Some("5550199".into()),
            ..ProfileChanges::default()
        };
        let updated = auth.update_profile(b.id, &changes).await.unwrap();
        assert_eq!(updated.mobile, "5550199");
        assert_eq!(updated.email.as_str(), "b@example.com");
    }

    #[tokio::test]
    async fn test_current_unknown_admin() {
        let (store, keys) = (MemoryAdminStore::default(), keys());
        let auth = AuthService::new(&store, &keys);
        assert!(matches!(
            auth.current(AdminId::new(42)).await,
            Err(AuthError::UserNotFound)
        ));
    }
}
