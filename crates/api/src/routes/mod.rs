//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Public (/api)
//! POST /contact                  - Contact form
//! POST /job-application          - Job application (multipart, optional resume)
//! POST /hire-developer           - Hire-a-developer enquiry
//! POST /reseller                 - Reseller enquiry
//! GET  /open-positions           - Active positions (?department&type&location&search)
//! GET  /products                 - Active products
//! GET  /services                 - Active services
//! GET  /testimonials             - Active testimonials
//!
//! # Admin (/api/admin), all POST
//! /register /login /logout /refresh-token /change-password /update-profile /get-user
//! /contacts/{get, get/{id}, update/{id}, delete/{id}, stats}
//! /job-applications/{get, get/{id}, update/{id}, delete/{id}, download-resume/{id}, stats}
//! /hire-developers/{get, get/{id}, update/{id}, delete/{id}, stats}
//! /resellers/{get, get/{id}, delete/{id}}
//! /open-positions/{create, get, get/{id}, update/{id}, delete/{id}, toggle-status/{id}, stats}
//! /products/…, /services/…, /testimonials/…   (same verbs as open positions)
//! /dashboard/stats
//! ```

pub mod auth;
pub mod catalog;
pub mod contacts;
pub mod dashboard;
pub mod hire_developers;
pub mod job_applications;
pub mod open_positions;
pub mod public;
pub mod resellers;
pub mod testimonials;

use axum::{
    Router,
    routing::{get, post},
};

use crate::models::{CatalogKind, ProductKind, ServiceKind};
use crate::state::AppState;

/// Admin account and session routes.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/change-password", post(auth::change_password))
        .route("/update-profile", post(auth::update_profile))
        .route("/get-user", post(auth::get_user))
}

/// Contact management routes.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/get", post(contacts::list))
        .route("/get/{id}", post(contacts::get))
        .route("/update/{id}", post(contacts::update))
        .route("/delete/{id}", post(contacts::delete))
        .route("/stats", post(contacts::stats))
}

/// Job application management routes.
pub fn job_application_routes() -> Router<AppState> {
    Router::new()
        .route("/get", post(job_applications::list))
        .route("/get/{id}", post(job_applications::get))
        .route("/update/{id}", post(job_applications::update))
        .route("/delete/{id}", post(job_applications::delete))
        .route(
            "/download-resume/{id}",
            post(job_applications::download_resume),
        )
        .route("/stats", post(job_applications::stats))
}

/// Hire-a-developer enquiry routes.
pub fn hire_developer_routes() -> Router<AppState> {
    Router::new()
        .route("/get", post(hire_developers::list))
        .route("/get/{id}", post(hire_developers::get))
        .route("/update/{id}", post(hire_developers::update))
        .route("/delete/{id}", post(hire_developers::delete))
        .route("/stats", post(hire_developers::stats))
}

/// Reseller enquiry routes.
pub fn reseller_routes() -> Router<AppState> {
    Router::new()
        .route("/get", post(resellers::list))
        .route("/get/{id}", post(resellers::get))
        .route("/delete/{id}", post(resellers::delete))
}

/// Open position routes.
pub fn open_position_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(open_positions::create))
        .route("/get", post(open_positions::list))
        .route("/get/{id}", post(open_positions::get))
        .route("/update/{id}", post(open_positions::update))
        .route("/toggle-status/{id}", post(open_positions::toggle_status))
        .route("/delete/{id}", post(open_positions::delete))
        .route("/stats", post(open_positions::stats))
}

/// Product or service routes.
pub fn catalog_routes<K: CatalogKind>() -> Router<AppState> {
    Router::new()
        .route("/create", post(catalog::create::<K>))
        .route("/get", post(catalog::list::<K>))
        .route("/get/{id}", post(catalog::get::<K>))
        .route("/update/{id}", post(catalog::update::<K>))
        .route("/toggle-status/{id}", post(catalog::toggle_status::<K>))
        .route("/delete/{id}", post(catalog::delete::<K>))
        .route("/stats", post(catalog::stats::<K>))
}

/// Testimonial routes.
pub fn testimonial_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(testimonials::create))
        .route("/get", post(testimonials::list))
        .route("/get/{id}", post(testimonials::get))
        .route("/update/{id}", post(testimonials::update))
        .route("/toggle-status/{id}", post(testimonials::toggle_status))
        .route("/delete/{id}", post(testimonials::delete))
        .route("/stats", post(testimonials::stats))
}

/// Every admin route, nested under `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .nest("/contacts", contact_routes())
        .nest("/job-applications", job_application_routes())
        .nest("/hire-developers", hire_developer_routes())
        .nest("/resellers", reseller_routes())
        .nest("/open-positions", open_position_routes())
        .nest("/products", catalog_routes::<ProductKind>())
        .nest("/services", catalog_routes::<ServiceKind>())
        .nest("/testimonials", testimonial_routes())
        .route("/dashboard/stats", post(dashboard::stats))
}

/// Public website routes, nested under `/api`.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(public::submit_contact))
        .route("/job-application", post(public::submit_job_application))
        .route("/hire-developer", post(public::submit_hire_developer))
        .route("/reseller", post(public::submit_reseller))
        .route("/open-positions", get(public::open_positions))
        .route("/products", get(public::catalog::<ProductKind>))
        .route("/services", get(public::catalog::<ServiceKind>))
        .route("/testimonials", get(public::testimonials))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/admin", admin_routes())
        .nest("/api", public_routes())
}
