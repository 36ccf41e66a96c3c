//! Admin hire-a-developer enquiry management.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::HireDeveloperId;

use crate::db::HireDeveloperRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::HireDeveloper;
use crate::models::hire_developer::{HireDeveloperFilter, HireDeveloperPage, HireDeveloperUpdateDraft};
use crate::models::input::ListRequest;
use crate::models::stats::HireDeveloperSummary;
use crate::response::ApiResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "Hire developer request not found";

/// List enquiries together with per-status counts.
#[instrument(skip(state, _admin, request))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<HireDeveloperFilter>>,
) -> Result<ApiResponse<HireDeveloperPage>, AppError> {
    let range = request.params.date_range()?;
    let repo = HireDeveloperRepository::new(state.pool());
    let (page, stats) = tokio::try_join!(
        repo.list(&request.params, range, &request.filter),
        repo.status_counts(),
    )?;
    Ok(ApiResponse::ok(
        "Hire developer requests retrieved successfully",
        HireDeveloperPage { page, stats },
    ))
}

/// Get an enquiry by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<HireDeveloperId>,
) -> Result<ApiResponse<HireDeveloper>, AppError> {
    let enquiry = HireDeveloperRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::ok(
        "Hire developer request retrieved successfully",
        enquiry,
    ))
}

/// Update status, notes and quote.
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<HireDeveloperId>,
    JsonBody(draft): JsonBody<HireDeveloperUpdateDraft>,
) -> Result<ApiResponse<HireDeveloper>, AppError> {
    let update = draft.validate()?;
    let enquiry = HireDeveloperRepository::new(state.pool())
        .update(id, &update, admin.id)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok(
        "Hire developer request updated successfully",
        enquiry,
    ))
}

/// Delete an enquiry.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<HireDeveloperId>,
) -> Result<ApiResponse<()>, AppError> {
    HireDeveloperRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(NOT_FOUND)?;
    tracing::info!(enquiry_id = %id, "hire developer request deleted");
    Ok(ApiResponse::ok("Hire developer request deleted successfully", ()))
}

/// Per-status counts and acceptance rate.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<HireDeveloperSummary>, AppError> {
    let stats = HireDeveloperRepository::new(state.pool()).summary().await?;
    Ok(ApiResponse::ok(
        "Hire developer statistics retrieved successfully",
        stats,
    ))
}
