//! Admin reseller enquiry management.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::{Page, ResellerId};

use crate::db::ResellerRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::Reseller;
use crate::models::input::ListParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "Reseller not found";

/// List reseller enquiries.
#[instrument(skip(state, _admin, params))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(params): JsonBody<ListParams>,
) -> Result<ApiResponse<Page<Reseller>>, AppError> {
    let range = params.date_range()?;
    let page = ResellerRepository::new(state.pool())
        .list(&params, range)
        .await?;
    Ok(ApiResponse::ok("Resellers retrieved successfully", page))
}

/// Get a reseller enquiry by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<ResellerId>,
) -> Result<ApiResponse<Reseller>, AppError> {
    let reseller = ResellerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::ok("Reseller retrieved successfully", reseller))
}

/// Delete a reseller enquiry.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<ResellerId>,
) -> Result<ApiResponse<()>, AppError> {
    ResellerRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Reseller deleted successfully", ()))
}
