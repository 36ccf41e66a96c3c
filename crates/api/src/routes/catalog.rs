//! Admin product and service management.
//!
//! Every handler is generic over [`CatalogKind`]; the router instantiates
//! them once for products and once for services.

use axum::extract::State;
use tracing::instrument;

use corpsite_core::Page;

use crate::db::CatalogRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{FormBody, IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::catalog::CatalogDraft;
use crate::models::input::{ActiveFilter, ListRequest};
use crate::models::stats::ActiveCounts;
use crate::models::{CatalogItem, CatalogKind, StoredFile};
use crate::response::ApiResponse;
use crate::services::UploadCategory;
use crate::state::AppState;

fn not_found<K: CatalogKind>() -> String {
    format!("{} not found", K::NAME)
}

/// Store the `image` part, if one was sent.
async fn save_image(state: &AppState, form: &mut FormBody) -> Result<Option<StoredFile>, AppError> {
    match form.take_file("image") {
        Some(part) => Ok(Some(
            state.uploads().save(UploadCategory::Products, part).await?,
        )),
        None => Ok(None),
    }
}

/// Create an entry, with an optional image.
#[instrument(skip(state, _admin, form), fields(kind = K::NAME))]
pub async fn create<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut form: FormBody,
) -> Result<ApiResponse<CatalogItem<K>>, AppError> {
    let mut fields = form.parse::<CatalogDraft>()?.validate_new::<K>()?;
    fields.image = save_image(&state, &mut form).await?;

    let result = CatalogRepository::<K>::new(state.pool()).create(&fields).await;
    if result.is_err()
        && let Some(image) = &fields.image
    {
        state.uploads().remove(&image.path).await;
    }
    let item = result?;

    tracing::info!(id = %item.id, "catalogue entry created");
    Ok(ApiResponse::created(
        format!("{} created successfully", K::NAME),
        item,
    ))
}

/// List entries.
#[instrument(skip(state, _admin, request), fields(kind = K::NAME))]
pub async fn list<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<ActiveFilter>>,
) -> Result<ApiResponse<Page<CatalogItem<K>>>, AppError> {
    let page = CatalogRepository::<K>::new(state.pool())
        .list(&request.params, request.filter)
        .await?;
    Ok(ApiResponse::ok(format!("{} fetched", K::PLURAL), page))
}

/// Get an entry by ID.
#[instrument(skip(state, _admin), fields(kind = K::NAME))]
pub async fn get<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<K::Id>,
) -> Result<ApiResponse<CatalogItem<K>>, AppError> {
    let item = CatalogRepository::<K>::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(not_found::<K>()))?;
    Ok(ApiResponse::ok(format!("{} fetched", K::NAME), item))
}

/// Apply a partial update, replacing the image if one was sent.
#[instrument(skip(state, _admin, form), fields(kind = K::NAME))]
pub async fn update<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<K::Id>,
    mut form: FormBody,
) -> Result<ApiResponse<CatalogItem<K>>, AppError> {
    let mut fields = form.parse::<CatalogDraft>()?.validate_patch::<K>()?;
    fields.image = save_image(&state, &mut form).await?;

    let result = CatalogRepository::<K>::new(state.pool())
        .update(id, &fields)
        .await
        .or_not_found(not_found::<K>());

    let (item, replaced) = match result {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(image) = &fields.image {
                state.uploads().remove(&image.path).await;
            }
            return Err(e);
        }
    };
    if let Some(old) = replaced {
        state.uploads().remove(&old.path).await;
    }

    Ok(ApiResponse::ok(format!("{} updated", K::NAME), item))
}

/// Flip `isActive`.
#[instrument(skip(state, _admin), fields(kind = K::NAME))]
pub async fn toggle_status<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<K::Id>,
) -> Result<ApiResponse<CatalogItem<K>>, AppError> {
    let item = CatalogRepository::<K>::new(state.pool())
        .toggle_active(id)
        .await
        .or_not_found(not_found::<K>())?;
    Ok(ApiResponse::ok(format!("{} status updated", K::NAME), item))
}

/// Delete an entry and its image.
#[instrument(skip(state, _admin), fields(kind = K::NAME))]
pub async fn delete<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<K::Id>,
) -> Result<ApiResponse<()>, AppError> {
    let item = CatalogRepository::<K>::new(state.pool())
        .delete(id)
        .await
        .or_not_found(not_found::<K>())?;

    if let Some(image) = &item.image {
        state.uploads().remove(&image.path).await;
    }
    tracing::info!(id = %id, "catalogue entry deleted");
    Ok(ApiResponse::ok(format!("{} deleted", K::NAME), ()))
}

/// Total, active and inactive counts.
#[instrument(skip(state, _admin), fields(kind = K::NAME))]
pub async fn stats<K: CatalogKind>(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<ActiveCounts>, AppError> {
    let counts = CatalogRepository::<K>::new(state.pool()).counts().await?;
    Ok(ApiResponse::ok(
        format!("{} statistics retrieved successfully", K::NAME),
        counts,
    ))
}
