//! Token cookies.
//!
//! Both tokens are set as `HttpOnly`, `SameSite=Strict` cookies on `/` with a
//! `Max-Age` equal to the token lifetime. `Secure` is set in production.

use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{IntoResponseParts, ResponseParts};
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

use crate::error::AppError;
use crate::services::{JwtKeys, TokenPair};

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Read a cookie value from the request headers.
#[must_use]
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn build(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

fn max_age(ttl: std::time::Duration) -> Duration {
    Duration::try_from(ttl).unwrap_or(Duration::MAX)
}

/// `Set-Cookie` headers for both tokens, usable as response parts.
#[derive(Debug, Clone)]
pub struct TokenCookies {
    access: Cookie<'static>,
    refresh: Cookie<'static>,
}

impl TokenCookies {
    /// Cookies carrying a freshly issued pair.
    #[must_use]
    pub fn issue(pair: &TokenPair, keys: &JwtKeys, secure: bool) -> Self {
        Self {
            access: build(
                ACCESS_TOKEN_COOKIE,
                pair.access_token.clone(),
                max_age(keys.access_ttl()),
                secure,
            ),
            refresh: build(
                REFRESH_TOKEN_COOKIE,
                pair.refresh_token.clone(),
                max_age(keys.refresh_ttl()),
                secure,
            ),
        }
    }

    /// Cookies that expire both tokens immediately.
    #[must_use]
    pub fn clear(secure: bool) -> Self {
        Self {
            access: build(ACCESS_TOKEN_COOKIE, String::new(), Duration::ZERO, secure),
            refresh: build(REFRESH_TOKEN_COOKIE, String::new(), Duration::ZERO, secure),
        }
    }
}

impl IntoResponseParts for TokenCookies {
    type Error = AppError;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for cookie in [self.access, self.refresh] {
            let value = HeaderValue::from_str(&cookie.to_string())
                .map_err(|e| AppError::Internal(format!("invalid cookie header: {e}")))?;
            res.headers_mut().append(header::SET_COOKIE, value);
        }
        Ok(res)
    }
}
