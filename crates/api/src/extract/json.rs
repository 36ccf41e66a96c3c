use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body.
///
/// An empty body deserialises as `{}`, so list endpoints can be called with
/// no body at all and fall back to their defaults.
#[derive(Debug, Clone, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        parse_json(&bytes).map(Self)
    }
}

pub(super) fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let body = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        bytes
    };
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    #[serde(default)]
    struct Filters {
        page: Option<i64>,
        search: Option<String>,
    }

    #[test]
    fn test_empty_body_is_defaults() {
        let filters: Filters = parse_json(b"").unwrap();
        assert!(filters.page.is_none());
        let filters: Filters = parse_json(b"  \n").unwrap();
        assert!(filters.search.is_none());
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let err = parse_json::<Filters>(b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_parses_fields() {
        let filters: Filters = parse_json(br#"{"page": 3, "search": "acme"}"#).unwrap();
        assert_eq!(filters.page, Some(3));
        assert_eq!(filters.search.as_deref(), Some("acme"));
    }
}
