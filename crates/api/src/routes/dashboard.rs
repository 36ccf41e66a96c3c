//! Dashboard summary endpoint.

use axum::extract::State;
use tracing::instrument;

use crate::db::DashboardRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::stats::DashboardStats;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Every entity's summary in one response.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = DashboardRepository::new(state.pool()).stats().await?;
    Ok(ApiResponse::ok(
        "Dashboard statistics retrieved successfully",
        stats,
    ))
}
