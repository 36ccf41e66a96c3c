//! Admin job application management.

use axum::{
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use corpsite_core::{JobApplicationId, JobApplicationStatus, Page};

use crate::db::JobApplicationRepository;
use crate::error::{AppError, RepositoryResultExt};
use crate::extract::{IdPath, JsonBody};
use crate::middleware::RequireAdmin;
use crate::models::input::ListRequest;
use crate::models::job_application::{JobApplicationFilter, JobApplicationStats};
use crate::models::lead::LeadUpdateDraft;
use crate::models::{JobApplication, StoredFile};
use crate::response::ApiResponse;
use crate::state::AppState;

const NOT_FOUND: &str = "Job application not found";

/// List applications.
#[instrument(skip(state, _admin, request))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(request): JsonBody<ListRequest<JobApplicationFilter>>,
) -> Result<ApiResponse<Page<JobApplication>>, AppError> {
    let range = request.params.date_range()?;
    let page = JobApplicationRepository::new(state.pool())
        .list(&request.params, range, &request.filter)
        .await?;
    Ok(ApiResponse::ok("Job applications retrieved successfully", page))
}

/// Get an application by ID.
#[instrument(skip(state, _admin))]
pub async fn get(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<JobApplicationId>,
) -> Result<ApiResponse<JobApplication>, AppError> {
    let application = JobApplicationRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    Ok(ApiResponse::ok("Job application retrieved successfully", application))
}

/// Update status and notes.
#[instrument(skip(state, admin, draft), fields(admin_id = %admin.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    IdPath(id): IdPath<JobApplicationId>,
    JsonBody(draft): JsonBody<LeadUpdateDraft<JobApplicationStatus>>,
) -> Result<ApiResponse<JobApplication>, AppError> {
    let update = draft.validate()?;
    let application = JobApplicationRepository::new(state.pool())
        .update(id, &update, admin.id)
        .await
        .or_not_found(NOT_FOUND)?;
    Ok(ApiResponse::ok("Job application updated successfully", application))
}

/// Delete an application and its resume file.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<JobApplicationId>,
) -> Result<ApiResponse<()>, AppError> {
    let application = JobApplicationRepository::new(state.pool())
        .delete(id)
        .await
        .or_not_found(NOT_FOUND)?;

    if let Some(resume) = &application.resume {
        state.uploads().remove(&resume.path).await;
    }
    tracing::info!(application_id = %id, "job application deleted");
    Ok(ApiResponse::ok("Job application deleted successfully", ()))
}

/// Stream the stored resume as an attachment.
#[instrument(skip(state, _admin))]
pub async fn download_resume(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    IdPath(id): IdPath<JobApplicationId>,
) -> Result<Response, AppError> {
    let resume = JobApplicationRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .and_then(|application| application.resume)
        .ok_or_else(|| AppError::not_found("Resume not found"))?;

    let bytes = state
        .uploads()
        .read(&resume.path)
        .await?
        .ok_or_else(|| AppError::not_found("Resume file not found"))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&resume)),
            (header::CONTENT_DISPOSITION, attachment(&resume)),
        ],
        bytes,
    )
        .into_response())
}

/// Applications totals, per-status counts and top job titles.
#[instrument(skip(state, _admin))]
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<ApiResponse<JobApplicationStats>, AppError> {
    let stats = JobApplicationRepository::new(state.pool()).stats().await?;
    Ok(ApiResponse::ok(
        "Job application statistics retrieved successfully",
        stats,
    ))
}

fn content_type(file: &StoredFile) -> HeaderValue {
    HeaderValue::from_str(&file.mimetype)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"))
}

/// `attachment` disposition with the applicant's file name.
///
/// Falls back to the stored name when the original is not a valid header.
fn attachment(file: &StoredFile) -> HeaderValue {
    let original = file.original_name.replace(['"', '\\'], "");
    HeaderValue::from_str(&format!("attachment; filename=\"{original}\""))
        .or_else(|_| HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.filename)))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn file(original_name: &str) -> StoredFile {
        StoredFile {
            filename: "0b6c.pdf".into(),
            original_name: original_name.into(),
            path: "resumes/0b6c.pdf".into(),
            size: 10,
            mimetype: "application/pdf".into(),
        }
    }

    #[test]
    fn test_attachment_uses_original_name() {
        assert_eq!(
            attachment(&file("Jane Doe CV.pdf")),
            "attachment; filename=\"Jane Doe CV.pdf\""
        );
        assert_eq!(
            attachment(&file("evil\".pdf")),
            "attachment; filename=\"evil.pdf\""
        );
    }

    #[test]
    fn test_attachment_falls_back_to_stored_name() {
        assert_eq!(
            attachment(&file("cv\n.pdf")),
            "attachment; filename=\"0b6c.pdf\""
        );
    }
}
