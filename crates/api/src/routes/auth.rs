//! Admin account and session endpoints.
//!
//! Login and refresh set `accessToken`/`refreshToken` cookies and also return
//! both tokens in the body for clients that prefer bearer headers.

use axum::{extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::AdminRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::extract::{FormBody, JsonBody};
use crate::middleware::{REFRESH_TOKEN_COOKIE, RequireAdmin, TokenCookies, authenticate, read_cookie};
use crate::models::Admin;
use crate::models::admin::{ChangePasswordDraft, LoginDraft, ProfileDraft, RegisterDraft};
use crate::response::ApiResponse;
use crate::services::{AuthService, TokenPair, UploadCategory};
use crate::state::AppState;

/// `login` response data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: Admin,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// `refresh-token` body; the cookie takes precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshDraft {
    pub refresh_token: Option<String>,
}

/// Create an admin account.
///
/// Open while no admin exists so the first account can be bootstrapped;
/// afterwards the caller must be an authenticated admin.
#[instrument(skip(state, headers, form))]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut form: FormBody,
) -> Result<ApiResponse<Admin>, AppError> {
    let repo = AdminRepository::new(state.pool());
    if repo.count().await? > 0 {
        authenticate(&headers, &state).await?;
    }

    let registration = form.parse::<RegisterDraft>()?.validate()?;
    let avatar = match form.take_file("avatar") {
        Some(part) => Some(state.uploads().save(UploadCategory::Profiles, part).await?.path),
        None => None,
    };

    let result = AuthService::new(&repo, state.keys())
        .register(registration, avatar.clone())
        .await;
    if result.is_err()
        && let Some(path) = &avatar
    {
        state.uploads().remove(path).await;
    }
    let admin = result?;

    Ok(ApiResponse::created("User Registered Successfully", admin))
}

/// Exchange credentials for a token pair.
#[instrument(skip(state, draft))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(draft): JsonBody<LoginDraft>,
) -> Result<(TokenCookies, ApiResponse<LoginResponse>), AppError> {
    let (email, password) = draft.validate()?;
    let repo = AdminRepository::new(state.pool());
    let (admin, tokens) = AuthService::new(&repo, state.keys())
        .login(&email, &password)
        .await?;

    set_sentry_user(admin.id.as_i32(), Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "admin logged in");

    let cookies = TokenCookies::issue(&tokens, state.keys(), state.config().is_production());
    Ok((
        cookies,
        ApiResponse::ok(
            "User logged in successfully",
            LoginResponse {
                user: admin,
                tokens,
            },
        ),
    ))
}

/// Revoke the refresh token and clear both cookies.
#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn logout(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<(TokenCookies, ApiResponse<()>), AppError> {
    let repo = AdminRepository::new(state.pool());
    AuthService::new(&repo, state.keys()).logout(admin.id).await?;
    clear_sentry_user();

    Ok((
        TokenCookies::clear(state.config().is_production()),
        ApiResponse::ok("User logged out successfully", ()),
    ))
}

/// Rotate the token pair.
#[instrument(skip(state, headers, body))]
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<RefreshDraft>,
) -> Result<(TokenCookies, ApiResponse<TokenPair>), AppError> {
    let presented = read_cookie(&headers, REFRESH_TOKEN_COOKIE).or(body.refresh_token);

    let repo = AdminRepository::new(state.pool());
    let tokens = AuthService::new(&repo, state.keys())
        .refresh(presented.as_deref())
        .await?;

    let cookies = TokenCookies::issue(&tokens, state.keys(), state.config().is_production());
    Ok((
        cookies,
        ApiResponse::ok("Access token refreshed successfully", tokens),
    ))
}

/// Change the current admin's password.
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.id))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    JsonBody(draft): JsonBody<ChangePasswordDraft>,
) -> Result<ApiResponse<()>, AppError> {
    let (old_password, new_password) = draft.validate()?;
    let repo = AdminRepository::new(state.pool());
    AuthService::new(&repo, state.keys())
        .change_password(admin.id, &old_password, &new_password)
        .await?;

    Ok(ApiResponse::ok("Password changed successfully", ()))
}

/// Update email, mobile and avatar.
///
/// A replaced avatar file is removed once the new one is recorded.
#[instrument(skip(state, admin, form), fields(admin_id = %admin.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut form: FormBody,
) -> Result<ApiResponse<Admin>, AppError> {
    let mut changes = form.parse::<ProfileDraft>()?.validate()?;
    if let Some(part) = form.take_file("avatar") {
        changes.avatar = Some(state.uploads().save(UploadCategory::Profiles, part).await?.path);
    }

    let repo = AdminRepository::new(state.pool());
    let result = AuthService::new(&repo, state.keys())
        .update_profile(admin.id, &changes)
        .await;

    match (&result, &changes.avatar, &admin.avatar) {
        (Err(_), Some(new), _) => state.uploads().remove(new).await,
        (Ok(_), Some(new), Some(old)) if new != old => state.uploads().remove(old).await,
        _ => {}
    }
    let updated = result?;

    Ok(ApiResponse::ok("Admin details updated successfully", updated))
}

/// The authenticated admin.
#[instrument(skip(admin), fields(admin_id = %admin.id))]
pub async fn get_user(RequireAdmin(admin): RequireAdmin) -> ApiResponse<Admin> {
    ApiResponse::ok("Admin details fetched successfully", admin)
}
