//! Admin open position management.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::{OpenPositionId, Page};

use crate::db::OpenPositionRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::OpenPosition;
use crate::models::input::ListRequest;
use crate::models::open_position::{OpenPositionDraft, OpenPositionFilter, OpenPositionStats};
use crate::response::ApiResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "Open position not found";

/// Create a position posted by the current admin.
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(draft): JsonBody<OpenPositionDraft>,
) -> Result<ApiResponse<OpenPosition>, AppError> {
    let fields = draft.validate_new()?;
    let position = OpenPositionRepository::new(state.pool())
        .create(&fields, admin.id)
        .await?;
    tracing::info!(position_id = %position.id, "open position created");
    Ok(ApiResponse::created("Open position created successfully", position))
}

/// List positions.
#[instrument(skip(state, _admin, request))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<OpenPositionFilter>>,
) -> Result<ApiResponse<Page<OpenPosition>>, AppError> {
    let page = OpenPositionRepository::new(state.pool())
        .list(&request.params, &request.filter)
        .await?;
    Ok(ApiResponse::ok("Open positions retrieved successfully", page))
}

/// Get a position by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<OpenPositionId>,
) -> Result<ApiResponse<OpenPosition>, AppError> {
    let position = OpenPositionRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::ok("Open position retrieved successfully", position))
}

/// Apply a partial update.
#[instrument(skip(state, _admin, draft))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<OpenPositionId>,
    JsonBody(draft): JsonBody<OpenPositionDraft>,
) -> Result<ApiResponse<OpenPosition>, AppError> {
    let fields = draft.validate_patch()?;
    let position = OpenPositionRepository::new(state.pool())
        .update(id, &fields)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Open position updated successfully", position))
}

/// Flip `isActive`.
#[instrument(skip(state, _admin))]
pub async fn toggle_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<OpenPositionId>,
) -> Result<ApiResponse<OpenPosition>, AppError> {
    let position = OpenPositionRepository::new(state.pool())
        .toggle_active(id)
        .await
        .or_not_found(NOT_FOUND)?;
    let message = if position.is_active {
        "Position activated successfully"
    } else {
        "Position deactivated successfully"
    };
    Ok(ApiResponse::ok(message, position))
}

/// Delete a position.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<OpenPositionId>,
) -> Result<ApiResponse<()>, AppError> {
    OpenPositionRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(NOT_FOUND)?;
    tracing::info!(position_id = %id, "open position deleted");
    Ok(ApiResponse::ok("Open position deleted successfully", ()))
}

/// Visibility overview and breakdowns of active positions.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<OpenPositionStats>, AppError> {
    let stats = OpenPositionRepository::new(state.pool()).stats().await?;
    Ok(ApiResponse::ok("Position statistics retrieved successfully", stats))
}
