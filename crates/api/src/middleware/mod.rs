//! HTTP middleware stack for the API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (propagate or generate `x-request-id`)
//! 4. Error detail (attach `stack` to error envelopes outside production)
//! 5. Security headers
//! 6. CORS
//! 7. Body limit
//!
//! Admin routes additionally extract [`RequireAdmin`].

pub mod auth;
pub mod cookies;
pub mod error_detail;
pub mod request_id;
pub mod security_headers;

pub use auth::{RequireAdmin, authenticate, bearer_token};
pub use cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, TokenCookies, read_cookie};
pub use error_detail::error_detail_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
