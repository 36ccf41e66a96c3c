//! Admin authentication extractor.
//!
//! Admin routes take [`RequireAdmin`] as an argument. The access token comes
//! from the `accessToken` cookie or, failing that, an `Authorization: Bearer`
//! header. Every failure is the same `401 unauthorized access`.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use crate::db::AdminRepository;
use crate::error::{AppError, set_sentry_user};
use crate::models::Admin;
use crate::services::{AdminStore, AuthError};
use crate::state::AppState;

use super::cookies::{ACCESS_TOKEN_COOKIE, read_cookie};

/// Extractor that requires a valid admin access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello, {}!", admin.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Admin);

/// The token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and surrounding whitespace is
/// ignored.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized() -> AppError {
    AppError::Auth(AuthError::InvalidAccessToken)
}

/// Resolve the admin behind the request's access token.
///
/// # Errors
///
/// Returns a `401` for a missing, invalid or orphaned token and a `500` if
/// the admin lookup itself fails.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Admin, AppError> {
    let token = read_cookie(headers, ACCESS_TOKEN_COOKIE)
        .or_else(|| bearer_token(headers).map(str::to_owned))
        .ok_or_else(unauthorized)?;

    let admin_id = state.keys().verify_access(&token).map_err(|e| {
        tracing::debug!(error = %e, "rejected access token");
        unauthorized()
    })?;

    // Database outages surface as 500 rather than masquerading as a bad token
    let admin = AdminRepository::new(state.pool())
        .find_by_id(admin_id)
        .await?
        .ok_or_else(unauthorized)?;

    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
    tracing::Span::current().record("admin_id", admin.id.as_i32());

    Ok(admin)
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state).await.map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer   abc  ")), Some("abc"));
        assert_eq!(bearer_token(&headers("  BEARER abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer    ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
