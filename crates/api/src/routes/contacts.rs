//! Admin contact management.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::{ContactId, ContactStatus, Page};

use crate::db::ContactRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::Contact;
use crate::models::contact::{ContactFilter, ContactStats};
use crate::models::input::ListRequest;
use crate::models::lead::LeadUpdateDraft;
use crate::response::ApiResponse;
use crate::state::AppState;

/// List contacts.
#[instrument(skip(state, _admin, request))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<ContactFilter>>,
) -> Result<ApiResponse<Page<Contact>>, AppError> {
    let range = request.params.date_range()?;
    let page = ContactRepository::new(state.pool())
        .list(&request.params, range, &request.filter)
        .await?;
    Ok(ApiResponse::ok("Contacts retrieved successfully", page))
}

/// Get a contact by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<ContactId>,
) -> Result<ApiResponse<Contact>, AppError> {
    let contact = ContactRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Contact not found"))?;
    Ok(ApiResponse::ok("Contact retrieved successfully", contact))
}

/// Update status and notes.
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<ContactId>,
    JsonBody(draft): JsonBody<LeadUpdateDraft<ContactStatus>>,
) -> Result<ApiResponse<Contact>, AppError> {
    let update = draft.validate()?;
    let contact = ContactRepository::new(state.pool())
        .update(id, &update, admin.id)
        .await
        .or_not_found("Contact not found")?;
    Ok(ApiResponse::ok("Contact updated successfully", contact))
}

/// Delete a contact.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<ContactId>,
) -> Result<ApiResponse<()>, AppError> {
    ContactRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found("Contact not found")?;
    tracing::info!(contact_id = %id, "contact deleted");
    Ok(ApiResponse::ok("Contact deleted successfully", ()))
}

/// Totals, recent submissions and per-status counts.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<ContactStats>, AppError> {
    let stats = ContactRepository::new(state.pool()).stats().await?;
    Ok(ApiResponse::ok("Contact statistics retrieved successfully", stats))
}
