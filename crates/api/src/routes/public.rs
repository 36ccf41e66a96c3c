//! Public website endpoints.
//!
//! Submissions create leads; reads only ever return active content.

use axum::extract::State;
use tracing::instrument;

use crate::db::{
    CatalogRepository, ContactRepository, HireDeveloperRepository, JobApplicationRepository,
    OpenPositionRepository, ResellerRepository, TestimonialRepository,
};
use crate::error::AppError;
use crate::extract::{FormBody, JsonBody, QueryParams};
use crate::models::catalog::PublicCatalogItem;
use crate::models::contact::ContactDraft;
use crate::models::hire_developer::HireDeveloperDraft;
use crate::models::job_application::JobApplicationDraft;
use crate::models::open_position::{PublicOpenPosition, PublicPositionQuery};
use crate::models::reseller::ResellerDraft;
use crate::models::testimonial::PublicTestimonial;
use crate::models::{CatalogKind, Contact, HireDeveloper, JobApplication, Reseller};
use crate::response::ApiResponse;
use crate::services::UploadCategory;
use crate::state::AppState;

/// Contact form submission.
#[instrument(skip(state, draft))]
pub async fn submit_contact(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<ContactDraft>,
) -> Result<ApiResponse<Contact>, AppError> {
    let contact = draft.validate()?;
    let contact = ContactRepository::new(state.pool()).create(&contact).await?;
    tracing::info!(contact_id = %contact.id, "contact submitted");
    Ok(ApiResponse::created(
        "Thank you for your message. We'll get back to you soon!",
        contact,
    ))
}

/// Job application, optionally with a `resume` file.
#[instrument(skip(state, form))]
pub async fn submit_job_application(
    State(state): State<AppState>,
    mut form: FormBody,
) -> Result<ApiResponse<JobApplication>, AppError> {
    let mut application = form.parse::<JobApplicationDraft>()?.validate()?;
    if let Some(part) = form.take_file("resume") {
        application.resume = Some(state.uploads().save(UploadCategory::Resumes, part).await?);
    }

    let result = JobApplicationRepository::new(state.pool())
        .create(&application)
        .await;
    if result.is_err()
        && let Some(resume) = &application.resume
    {
        state.uploads().remove(&resume.path).await;
    }
    let application = result?;

    tracing::info!(application_id = %application.id, "job application submitted");
    Ok(ApiResponse::created(
        "Thank you for your application. We'll review it and get back to you soon!",
        application,
    ))
}

/// Hire-a-developer enquiry.
#[instrument(skip(state, draft))]
pub async fn submit_hire_developer(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<HireDeveloperDraft>,
) -> Result<ApiResponse<HireDeveloper>, AppError> {
    let enquiry = draft.validate()?;
    let enquiry = HireDeveloperRepository::new(state.pool())
        .create(&enquiry)
        .await?;
    tracing::info!(enquiry_id = %enquiry.id, "hire developer request submitted");
    Ok(ApiResponse::created(
        "Thank you for your hire request. We'll review it and get back to you soon!",
        enquiry,
    ))
}

/// Reseller enquiry.
#[instrument(skip(state, draft))]
pub async fn submit_reseller(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<ResellerDraft>,
) -> Result<ApiResponse<Reseller>, AppError> {
    let reseller = draft.validate()?;
    let reseller = ResellerRepository::new(state.pool())
        .create(&reseller)
        .await?;
    Ok(ApiResponse::created("Reseller saved successfully", reseller))
}

/// Active positions, highest priority first.
#[instrument(skip(state))]
pub async fn open_positions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PublicPositionQuery>,
) -> Result<ApiResponse<Vec<PublicOpenPosition>>, AppError> {
    let positions = OpenPositionRepository::new(state.pool())
        .list_public(&query)
        .await?
        .into_iter()
        .map(PublicOpenPosition::from)
        .collect();
    Ok(ApiResponse::ok("Open positions fetched", positions))
}

/// Active products or services, newest first.
#[instrument(skip(state), fields(kind = K::NAME))]
pub async fn catalog<K: CatalogKind>(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PublicCatalogItem<K>>>, AppError> {
    let items = CatalogRepository::<K>::new(state.pool())
        .list_active()
        .await?
        .into_iter()
        .map(PublicCatalogItem)
        .collect();
    Ok(ApiResponse::ok(
        format!("{} retrieved successfully", K::PLURAL),
        items,
    ))
}

/// Active testimonials, newest first.
#[instrument(skip(state))]
pub async fn testimonials(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<PublicTestimonial>>, AppError> {
    let testimonials = TestimonialRepository::new(state.pool())
        .list_public()
        .await?;
    Ok(ApiResponse::ok(
        "Testimonials fetched successfully",
        testimonials,
    ))
}
