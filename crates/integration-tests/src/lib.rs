//! Integration tests for the corpsite API.
//!
//! Black-box tests that talk to a running server over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database and an admin account
//! cargo run -p corpsite-cli -- migrate
//! cargo run -p corpsite-cli -- admin create -e admin@example.com -m 5550100 -p 'test-password'
//!
//! # Start the server, then run the ignored tests
//! cargo run -p corpsite-api &
//! cargo test -p corpsite-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - server root (default: `http://localhost:3000`)
//! - `TEST_ADMIN_EMAIL`, `TEST_ADMIN_PASSWORD` - credentials of an existing admin

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

/// Server root URL.
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Absolute URL for a path under the server root.
#[must_use]
pub fn url(path: &str) -> String {
    format!("{}{path}", base_url())
}

/// A client that keeps cookies between requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Admin credentials from the environment.
#[must_use]
pub fn admin_credentials() -> (String, String) {
    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password =
        std::env::var("TEST_ADMIN_PASSWORD").unwrap_or_else(|_| "test-password".to_string());
    (email, password)
}

/// Log in and return a client carrying the token cookies.
///
/// # Panics
///
/// Panics if the login request fails or is rejected.
pub async fn admin_client() -> Client {
    let client = cookie_client();
    let (email, password) = admin_credentials();
    let response = client
        .post(url("/api/admin/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK, "login rejected");
    client
}

/// Decode a response envelope, asserting the expected status.
///
/// # Panics
///
/// Panics if the status differs or the body is not an envelope.
pub async fn envelope(response: Response, expected: StatusCode) -> Value {
    let status = response.status();
    let body: Value = response.json().await.expect("Response is not JSON");
    assert_eq!(status, expected, "unexpected status, body: {body}");
    assert_eq!(body["status"], expected.as_u16());
    assert_eq!(body["success"], expected.is_success());
    body
}

/// A unique suffix so repeated runs do not collide.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
