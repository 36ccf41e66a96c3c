//! Signed access/refresh token pairs.
//!
//! Access tokens are short-lived and stateless. Refresh tokens are
//! long-lived and single-use: the most recently issued one is stored on
//! the admin record and every successful refresh replaces it, so a replayed
//! token no longer matches.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use corpsite_core::AdminId;

use super::{AdminStore, AuthError};
use crate::config::TokenConfig;
use crate::db::RepositoryError;

/// Principal type carried in access tokens.
const ADMIN_PRINCIPAL: &str = "Admin";

/// Claims inside an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: i32,
    #[serde(rename = "type")]
    pub principal: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims inside a refresh token.
///
/// `jti` makes two tokens issued within the same second distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: i32,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly issued token pair.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing material and lifetimes for both token kinds.
#[derive(Clone)]
pub struct JwtKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    /// Build keys from token configuration.
    #[must_use]
    pub fn from_config(config: &TokenConfig) -> Self {
        let access = config.access_secret.expose_secret().as_bytes();
        let refresh = config.refresh_secret.expose_secret().as_bytes();
        Self {
            access_encoding: EncodingKey::from_secret(access),
            access_decoding: DecodingKey::from_secret(access),
            refresh_encoding: EncodingKey::from_secret(refresh),
            refresh_decoding: DecodingKey::from_secret(refresh),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    /// Lifetime of access tokens (used for the cookie `Max-Age`).
    #[must_use]
    pub const fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Lifetime of refresh tokens (used for the cookie `Max-Age`).
    #[must_use]
    pub const fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign an access token for `admin_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn sign_access(&self, admin_id: AdminId) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: admin_id.as_i32(),
            principal: ADMIN_PRINCIPAL.to_owned(),
            iat,
            exp: iat + ttl_secs(self.access_ttl),
        };
        encode(&Header::default(), &claims, &self.access_encoding).map_err(AuthError::TokenEncoding)
    }

    /// Sign a refresh token for `admin_id`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn sign_refresh(&self, admin_id: AdminId) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: admin_id.as_i32(),
            jti: Uuid::new_v4().to_string(),
            iat,
            exp: iat + ttl_secs(self.refresh_ttl),
        };
        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(AuthError::TokenEncoding)
    }

    /// Verify an access token and return the admin it names.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidAccessToken` for bad signatures, expired
    /// tokens, or tokens not issued to an admin.
    pub fn verify_access(&self, token: &str) -> Result<AdminId, AuthError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &validation())
            .map_err(|_| AuthError::InvalidAccessToken)?;
        if data.claims.principal != ADMIN_PRINCIPAL {
            return Err(AuthError::InvalidAccessToken);
        }
        Ok(AdminId::new(data.claims.sub))
    }

    /// Verify a refresh token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRefreshToken` on any failure.
    pub fn verify_refresh(&self, token: &str) -> Result<AdminId, AuthError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &validation())
            .map_err(|_| AuthError::InvalidRefreshToken)?;
        Ok(AdminId::new(data.claims.sub))
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

fn ttl_secs(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2)
}

/// Issues, rotates and revokes refresh tokens against an [`AdminStore`].
pub struct TokenService<'a, S: ?Sized> {
    keys: &'a JwtKeys,
    store: &'a S,
}

impl<'a, S: AdminStore + ?Sized> TokenService<'a, S> {
    /// Create a token service.
    #[must_use]
    pub const fn new(keys: &'a JwtKeys, store: &'a S) -> Self {
        Self { keys, store }
    }

    /// Issue a new pair and make its refresh token the stored one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` or a repository error.
    pub async fn issue(&self, admin_id: AdminId) -> Result<TokenPair, AuthError> {
        let access_token = self.keys.sign_access(admin_id)?;
        let refresh_token = self.keys.sign_refresh(admin_id)?;

        self.store
            .set_refresh_token(admin_id, Some(&refresh_token))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// # Errors
    ///
    /// - `MissingRefreshToken` if none was presented
    /// - `InvalidRefreshToken` if it fails verification or names no admin
    /// - `StaleRefreshToken` if it is not the admin's current token
    pub async fn refresh(&self, presented: Option<&str>) -> Result<TokenPair, AuthError> {
        let presented = presented
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;

        let admin_id = self.keys.verify_refresh(presented)?;

        let stored = match self.store.refresh_token(admin_id).await {
            Ok(stored) => stored,
            Err(RepositoryError::NotFound) => return Err(AuthError::InvalidRefreshToken),
            Err(e) => return Err(e.into()),
        };

        if stored.as_deref() != Some(presented) {
            tracing::warn!(admin_id = %admin_id, "stale refresh token presented");
            return Err(AuthError::StaleRefreshToken);
        }

        let access_token = self.keys.sign_access(admin_id)?;
        let refresh_token = self.keys.sign_refresh(admin_id)?;

        // The read above can race a concurrent refresh; only the swap decides.
        if !self
            .store
            .rotate_refresh_token(admin_id, presented, &refresh_token)
            .await?
        {
            tracing::warn!(admin_id = %admin_id, "refresh token rotated concurrently");
            return Err(AuthError::StaleRefreshToken);
        }

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Clear the stored refresh token. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the write fails.
    pub async fn revoke(&self, admin_id: AdminId) -> Result<(), AuthError> {
        match self.store.set_refresh_token(admin_id, None).await {
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::models::{Admin, AdminCredentials, NewAdmin, ProfileChanges};
    use crate::services::auth::store::memory::MemoryAdminStore;

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&TokenConfig {
            access_secret: SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6a"),
            refresh_secret: SecretString::from("Zq8!vN2@kL5#pW7$rT0*uY4^xC6&mB3b"),
            access_ttl: Duration::from_secs(60),
            refresh_ttl: Duration::from_secs(600),
        })
    }

    async fn store_with_admin() -> (MemoryAdminStore, AdminId) {
        let store = MemoryAdminStore::default();
        let admin = store
            .create(NewAdmin {
                email: corpsite_core::Email::parse("ops@example.com").unwrap(),
                mobile: "5550100".into(),
                password_hash: "x".into(),
                avatar: None,
            })
            .await
            .unwrap();
        (store, admin.id)
    }

    #[test]
    fn test_access_token_round_trip() {
        let keys = keys();
        let token = keys.sign_access(AdminId::new(7)).unwrap();
        assert_eq!(keys.verify_access(&token).unwrap(), AdminId::new(7));
    }

    #[test]
    fn test_access_and_refresh_keys_are_not_interchangeable() {
        let keys = keys();
        let refresh = keys.sign_refresh(AdminId::new(7)).unwrap();
        assert!(matches!(
            keys.verify_access(&refresh),
            Err(AuthError::InvalidAccessToken)
        ));
        let access = keys.sign_access(AdminId::new(7)).unwrap();
        assert!(matches!(
            keys.verify_refresh(&access),
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let keys = keys();
        let claims = AccessClaims {
            sub: 1,
            principal: ADMIN_PRINCIPAL.into(),
            iat: 1_000,
            exp: 1_060,
        };
        let token = encode(&Header::default(), &claims, &keys.access_encoding).unwrap();
        assert!(keys.verify_access(&token).is_err());
    }

    #[test]
    fn test_non_admin_principal_rejected() {
        let keys = keys();
        let now = Utc::now().timestamp();
        let claims = AccessClaims {
            sub: 1,
            principal: "Customer".into(),
            iat: now,
            exp: now + 60,
        };
        let token = encode(&Header::default(), &claims, &keys.access_encoding).unwrap();
        assert!(matches!(
            keys.verify_access(&token),
            Err(AuthError::InvalidAccessToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_rejects_replay() {
        let keys = keys();
        let (store, id) = store_with_admin().await;
        let tokens = TokenService::new(&keys, &store);

        let first = tokens.issue(id).await.unwrap();
        assert_eq!(store.stored_refresh_token(id), Some(first.refresh_token.clone()));

        let second = tokens.refresh(Some(&first.refresh_token)).await.unwrap();
        assert_ne!(first.refresh_token, second.refresh_token);
        assert_eq!(store.stored_refresh_token(id), Some(second.refresh_token.clone()));

        let replay = tokens.refresh(Some(&first.refresh_token)).await;
        assert!(matches!(replay, Err(AuthError::StaleRefreshToken)));
    }

    #[tokio::test]
    async fn test_refresh_after_revoke_is_stale() {
        let keys = keys();
        let (store, id) = store_with_admin().await;
        let tokens = TokenService::new(&keys, &store);

        let pair = tokens.issue(id).await.unwrap();
        tokens.revoke(id).await.unwrap();
        tokens.revoke(id).await.unwrap();

        assert!(store.stored_refresh_token(id).is_none());
        assert!(matches!(
            tokens.refresh(Some(&pair.refresh_token)).await,
            Err(AuthError::StaleRefreshToken)
        ));
    }

    #[tokio::test]
    async fn test_refresh_missing_or_garbage() {
        let keys = keys();
        let (store, _) = store_with_admin().await;
        let tokens = TokenService::new(&keys, &store);

        assert!(matches!(
            tokens.refresh(None).await,
            Err(AuthError::MissingRefreshToken)
        ));
        assert!(matches!(
            tokens.refresh(Some("  ")).await,
            Err(AuthError::MissingRefreshToken)
        ));
        assert!(matches!(
            tokens.refresh(Some("not.a.jwt")).await,
            Err(AuthError::InvalidRefreshToken)
        ));
    }

    /// Yields on every token read, like a database round-trip would.
    struct YieldingStore(MemoryAdminStore);

    #[async_trait::async_trait]
    impl AdminStore for YieldingStore {
        async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
            self.0.find_by_id(id).await
        }

        async fn find_credentials_by_email(
            &self,
            email: &str,
        ) -> Result<Option<AdminCredentials>, RepositoryError> {
            self.0.find_credentials_by_email(email).await
        }

        async fn find_credentials_by_id(
            &self,
            id: AdminId,
        ) -> Result<Option<AdminCredentials>, RepositoryError> {
            self.0.find_credentials_by_id(id).await
        }

        async fn create(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
            self.0.create(admin).await
        }

        async fn update_profile(
            &self,
            id: AdminId,
            changes: &ProfileChanges,
        ) -> Result<Admin, RepositoryError> {
            self.0.update_profile(id, changes).await
        }

        async fn set_password_hash(&self, id: AdminId, hash: &str) -> Result<(), RepositoryError> {
            self.0.set_password_hash(id, hash).await
        }

        async fn refresh_token(&self, id: AdminId) -> Result<Option<String>, RepositoryError> {
            let token = self.0.refresh_token(id).await;
            tokio::task::yield_now().await;
            token
        }

        async fn set_refresh_token(
            &self,
            id: AdminId,
            token: Option<&str>,
        ) -> Result<(), RepositoryError> {
            self.0.set_refresh_token(id, token).await
        }

        async fn rotate_refresh_token(
            &self,
            id: AdminId,
            expected: &str,
            new: &str,
        ) -> Result<bool, RepositoryError> {
            self.0.rotate_refresh_token(id, expected, new).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_refresh_with_same_token_rotates_once() {
        let keys = keys();
        let (inner, id) = store_with_admin().await;
        let store = YieldingStore(inner);
        let tokens = TokenService::new(&keys, &store);

        let pair = tokens.issue(id).await.unwrap();
        let (first, second) = tokio::join!(
            tokens.refresh(Some(&pair.refresh_token)),
            tokens.refresh(Some(&pair.refresh_token)),
        );

        let winners: Vec<_> = [&first, &second]
            .into_iter()
            .filter_map(|r| r.as_ref().ok())
            .collect();
        assert_eq!(winners.len(), 1);
        assert!(
            matches!(first, Err(AuthError::StaleRefreshToken))
                || matches!(second, Err(AuthError::StaleRefreshToken))
        );
        assert_eq!(
            store.0.stored_refresh_token(id),
            Some(winners[0].refresh_token.clone())
        );
    }

    #[tokio::test]
    async fn test_refresh_for_deleted_admin_is_invalid() {
        let keys = keys();
        let store = MemoryAdminStore::default();
        let tokens = TokenService::new(&keys, &store);
        let orphan = keys.sign_refresh(AdminId::new(99)).unwrap();

        assert!(matches!(
            tokens.refresh(Some(&orphan)).await,
            Err(AuthError::InvalidRefreshToken)
        ));
    }
}
