//! Admin testimonial management.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::{Page, TestimonialId};

use crate::db::TestimonialRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::Testimonial;
use crate::models::input::{ActiveFilter, ListRequest};
use crate::models::stats::ActiveCounts;
use crate::models::testimonial::TestimonialDraft;
use crate::response::ApiResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "Testimonial not found";

/// Create a testimonial.
#[instrument(skip(state, _admin, draft))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(draft): JsonBody<TestimonialDraft>,
) -> Result<ApiResponse<Testimonial>, AppError> {
    let fields = draft.validate_new()?;
    let testimonial = TestimonialRepository::new(state.pool())
        .create(&fields)
        .await?;
    Ok(ApiResponse::created(
        "Testimonial created successfully",
        testimonial,
    ))
}

/// List testimonials.
#[instrument(skip(state, _admin, request))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<ActiveFilter>>,
) -> Result<ApiResponse<Page<Testimonial>>, AppError> {
    let page = TestimonialRepository::new(state.pool())
        .list(&request.params, request.filter)
        .await?;
    Ok(ApiResponse::ok("Testimonials fetched", page))
}

/// Get a testimonial by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<TestimonialId>,
) -> Result<ApiResponse<Testimonial>, AppError> {
    let testimonial = TestimonialRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::ok("Testimonial fetched", testimonial))
}

/// Apply a partial update.
#[instrument(skip(state, _admin, draft))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<TestimonialId>,
    JsonBody(draft): JsonBody<TestimonialDraft>,
) -> Result<ApiResponse<Testimonial>, AppError> {
    let fields = draft.validate_patch()?;
    let testimonial = TestimonialRepository::new(state.pool())
        .update(id, &fields)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Testimonial updated", testimonial))
}

/// Flip `isActive`.
#[instrument(skip(state, _admin))]
pub async fn toggle_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<TestimonialId>,
) -> Result<ApiResponse<Testimonial>, AppError> {
    let testimonial = TestimonialRepository::new(state.pool())
        .toggle_active(id)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Testimonial status updated", testimonial))
}

/// Delete a testimonial.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<TestimonialId>,
) -> Result<ApiResponse<()>, AppError> {
    TestimonialRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Testimonial deleted", ()))
}

/// Total, active and inactive counts.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<ActiveCounts>, AppError> {
    let counts = TestimonialRepository::new(state.pool()).counts().await?;
    Ok(ApiResponse::ok(
        "Testimonial statistics retrieved successfully",
        counts,
    ))
}
