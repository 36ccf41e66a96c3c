//! Integration tests for public submissions and their admin triage.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database
//! - The API server running (cargo run -p corpsite-api)
//! - An admin matching `TEST_ADMIN_EMAIL` / `TEST_ADMIN_PASSWORD`

use corpsite_integration_tests::{admin_client, cookie_client, envelope, unique, url};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

/// Find a single row by a unique search term in an admin list.
async fn find_one(client: &reqwest::Client, list_path: &str, term: &str) -> Value {
    let response = client
        .post(url(list_path))
        .json(&json!({ "search": term }))
        .send()
        .await
        .expect("Failed to list");
    let body = envelope(response, StatusCode::OK).await;
    let items = body["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1, "expected exactly one match for {term}");
    items[0].clone()
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_contact_lifecycle() {
    let name = unique("contact");
    let submitted = cookie_client()
        .post(url("/api/contact"))
        .json(&json!({
            "name": name,
            "email": "Visitor@Example.com",
            "phone": "5550100",
            "message": "Please call me back"
        }))
        .send()
        .await
        .expect("Failed to submit contact");
    let submitted = envelope(submitted, StatusCode::CREATED).await;
    assert_eq!(submitted["data"]["status"], "new");
    assert_eq!(submitted["data"]["email"], "visitor@example.com");

    let admin = admin_client().await;
    let contact = find_one(&admin, "/api/admin/contacts/get", &name).await;
    let id = contact["id"].as_i64().expect("id");

    let updated = admin
        .post(url(&format!("/api/admin/contacts/update/{id}")))
        .json(&json!({ "status": "in_progress", "adminNotes": "Called once" }))
        .send()
        .await
        .expect("Failed to update contact");
    let updated = envelope(updated, StatusCode::OK).await;
    assert_eq!(updated["data"]["status"], "in_progress");
    assert!(updated["data"]["respondedBy"].is_number());

    let invalid = admin
        .post(url(&format!("/api/admin/contacts/update/{id}")))
        .json(&json!({ "status": "archived" }))
        .send()
        .await
        .expect("Failed to send invalid update");
    envelope(invalid, StatusCode::BAD_REQUEST).await;

    let stats = admin
        .post(url("/api/admin/contacts/stats"))
        .send()
        .await
        .expect("Failed to fetch stats");
    let stats = envelope(stats, StatusCode::OK).await;
    assert!(stats["data"]["totalContacts"].as_i64().unwrap_or(0) >= 1);
    assert!(stats["data"]["statusCounts"]["closed"].is_number());

    let deleted = admin
        .post(url(&format!("/api/admin/contacts/delete/{id}")))
        .send()
        .await
        .expect("Failed to delete contact");
    envelope(deleted, StatusCode::OK).await;

    let gone = admin
        .post(url(&format!("/api/admin/contacts/get/{id}")))
        .send()
        .await
        .expect("Failed to get contact");
    let gone = envelope(gone, StatusCode::NOT_FOUND).await;
    assert_eq!(gone["message"], "Contact not found");
}

// ============================================================================
// Job applications
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_job_application_with_resume() {
    let name = unique("applicant");
    let resume = Part::bytes(b"%PDF-1.4 test".to_vec())
        .file_name("cv.pdf")
        .mime_str("application/pdf")
        .expect("valid mime");
    let form = Form::new()
        .text("name", name.clone())
        .text("email", "applicant@example.com")
        .text("phone", "5550101")
        .text("jobTitle", "Backend Engineer")
        .text("experience", "4 years")
        .part("resume", resume);

    let submitted = cookie_client()
        .post(url("/api/job-application"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit application");
    let submitted = envelope(submitted, StatusCode::CREATED).await;
    assert_eq!(submitted["data"]["resume"]["originalName"], "cv.pdf");
    let resume_path = submitted["data"]["resume"]["path"]
        .as_str()
        .expect("resume path")
        .to_string();

    let admin = admin_client().await;
    let application = find_one(&admin, "/api/admin/job-applications/get", &name).await;
    let id = application["id"].as_i64().expect("id");

    let download = admin
        .post(url(&format!("/api/admin/job-applications/download-resume/{id}")))
        .send()
        .await
        .expect("Failed to download resume");
    assert_eq!(download.status(), StatusCode::OK);
    let disposition = download.headers()["content-disposition"]
        .to_str()
        .expect("ascii header")
        .to_string();
    assert!(disposition.contains("cv.pdf"));
    assert_eq!(
        download.bytes().await.expect("body").as_ref(),
        b"%PDF-1.4 test"
    );

    let deleted = admin
        .post(url(&format!("/api/admin/job-applications/delete/{id}")))
        .send()
        .await
        .expect("Failed to delete application");
    envelope(deleted, StatusCode::OK).await;

    let gone = cookie_client()
        .get(url(&format!("/uploads/{resume_path}")))
        .send()
        .await
        .expect("Failed to fetch resume file");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_job_application_rejects_non_document() {
    let resume = Part::bytes(b"MZ".to_vec())
        .file_name("cv.exe")
        .mime_str("application/octet-stream")
        .expect("valid mime");
    let form = Form::new()
        .text("name", "Mallory")
        .text("email", "mallory@example.com")
        .text("phone", "5550102")
        .text("jobTitle", "Anything")
        .text("experience", "none")
        .part("resume", resume);

    let response = cookie_client()
        .post(url("/api/job-application"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to submit application");
    envelope(response, StatusCode::BAD_REQUEST).await;
}

// ============================================================================
// Hire developer
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_hire_developer_quote_stamps_timestamp() {
    let name = unique("enquiry");
    let submitted = cookie_client()
        .post(url("/api/hire-developer"))
        .json(&json!({
            "name": name,
            "email": "cto@example.com",
            "phone": "5550103",
            "company": "Example Ltd",
            "technology": "Rust",
            "budgetMin": "1000",
            "budgetMax": 5000,
            "timeline": "3 months",
            "developersNeeded": "2",
            "engagementType": "full-time"
        }))
        .send()
        .await
        .expect("Failed to submit enquiry");
    envelope(submitted, StatusCode::CREATED).await;

    let admin = admin_client().await;
    let listed = admin
        .post(url("/api/admin/hire-developers/get"))
        .json(&json!({ "search": name }))
        .send()
        .await
        .expect("Failed to list enquiries");
    let listed = envelope(listed, StatusCode::OK).await;
    assert!(listed["data"]["stats"]["new"].as_i64().unwrap_or(0) >= 1);
    let id = listed["data"]["items"][0]["id"].as_i64().expect("id");

    let quoted = admin
        .post(url(&format!("/api/admin/hire-developers/update/{id}")))
        .json(&json!({ "status": "quoted", "quotedAmount": 4200 }))
        .send()
        .await
        .expect("Failed to quote");
    let quoted = envelope(quoted, StatusCode::OK).await;
    assert!(quoted["data"]["quotedAt"].is_string());

    let deleted = admin
        .post(url(&format!("/api/admin/hire-developers/delete/{id}")))
        .send()
        .await
        .expect("Failed to delete enquiry");
    envelope(deleted, StatusCode::OK).await;
}

// ============================================================================
// Resellers
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_reseller_submission_visible_to_admin() {
    let name = unique("reseller");
    let submitted = cookie_client()
        .post(url("/api/reseller"))
        .json(&json!({
            "name": name,
            "mobile": "5550104",
            "email": "shop@example.com",
            "businessCategory": "Retail",
            "state": "Karnataka",
            "city": "Bengaluru"
        }))
        .send()
        .await
        .expect("Failed to submit reseller");
    let submitted = envelope(submitted, StatusCode::CREATED).await;
    assert_eq!(submitted["message"], "Reseller saved successfully");

    let admin = admin_client().await;
    let reseller = find_one(&admin, "/api/admin/resellers/get", &name).await;
    let id = reseller["id"].as_i64().expect("id");

    let deleted = admin
        .post(url(&format!("/api/admin/resellers/delete/{id}")))
        .send()
        .await
        .expect("Failed to delete reseller");
    envelope(deleted, StatusCode::OK).await;
}
