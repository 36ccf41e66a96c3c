//! Integration tests for admin login, token refresh and logout.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The API server running (cargo run -p corpsite-api)
//! - An admin matching `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`

use corpsite_integration_tests::{
    admin_client, admin_credentials, cookie_client, envelope, url,
};
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_sets_cookies_and_returns_tokens() {
    let client = cookie_client();
    let (email, password) = admin_credentials();

    let response = client
        .post(url("/api/admin/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    let cookies: Vec<String> = response
        .cookies()
        .map(|c| c.name().to_string())
        .collect();
    assert!(cookies.contains(&"accessToken".to_string()));
    assert!(cookies.contains(&"refreshToken".to_string()));

    let body = envelope(response, StatusCode::OK).await;
    assert_eq!(body["message"], "User logged in successfully");
    assert!(body["data"]["accessToken"].is_string());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_wrong_password_rejected() {
    let (email, _) = admin_credentials();
    let response = cookie_client()
        .post(url("/api/admin/login"))
        .json(&json!({ "email": email, "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to send login");

    envelope(response, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_get_user_with_cookie() {
    let client = admin_client().await;
    let (email, _) = admin_credentials();

    let response = client
        .post(url("/api/admin/get-user"))
        .send()
        .await
        .expect("Failed to get user");

    let body = envelope(response, StatusCode::OK).await;
    assert_eq!(body["data"]["email"], email.to_lowercase());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_refresh_rotates_and_old_token_is_rejected() {
    let client = cookie_client();
    let (email, password) = admin_credentials();
    let login = client
        .post(url("/api/admin/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    let login = envelope(login, StatusCode::OK).await;
    let first_refresh = login["data"]["refreshToken"]
        .as_str()
        .expect("refresh token")
        .to_string();

    // Body token, on a client without cookies
    let bare = reqwest::Client::new();
    let rotated = bare
        .post(url("/api/admin/refresh-token"))
        .json(&json!({ "refreshToken": first_refresh }))
        .send()
        .await
        .expect("Failed to refresh");
    let rotated = envelope(rotated, StatusCode::OK).await;
    assert_ne!(rotated["data"]["refreshToken"], first_refresh.as_str());

    let replay = bare
        .post(url("/api/admin/refresh-token"))
        .json(&json!({ "refreshToken": first_refresh }))
        .send()
        .await
        .expect("Failed to replay refresh");
    envelope(replay, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_revokes_refresh_token() {
    let client = cookie_client();
    let (email, password) = admin_credentials();
    let login = client
        .post(url("/api/admin/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in");
    let login = envelope(login, StatusCode::OK).await;
    let refresh = login["data"]["refreshToken"].clone();

    let logout = client
        .post(url("/api/admin/logout"))
        .send()
        .await
        .expect("Failed to log out");
    let body = envelope(logout, StatusCode::OK).await;
    assert_eq!(body["message"], "User logged out successfully");

    let response = reqwest::Client::new()
        .post(url("/api/admin/refresh-token"))
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await
        .expect("Failed to refresh");
    envelope(response, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_requires_admin_once_bootstrapped() {
    let response = cookie_client()
        .post(url("/api/admin/register"))
        .json(&json!({
            "email": "intruder@example.com",
            "mobile": "5550199",
            "password": "long-enough-password"
        }))
        .send()
        .await
        .expect("Failed to send register");

    envelope(response, StatusCode::UNAUTHORIZED).await;
}
