//! Debug detail on error envelopes outside production.
//!
//! [`AppError`](crate::error::AppError) attaches a [`RenderedError`] to every
//! error response. In development the envelope is re-rendered with the
//! error's debug chain under `stack`; in production the response passes
//! through untouched.

use axum::{
    Json,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::response::RenderedError;
use crate::state::AppState;

/// Re-render error envelopes with a `stack` field when not in production.
pub async fn error_detail_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.config().is_production() {
        return response;
    }

    let Some(rendered) = response.extensions().get::<RenderedError>().cloned() else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let mut envelope = rendered.envelope;
    envelope.stack = Some(rendered.detail);

    // Keep status and headers; only the body changes
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    let body = Json(envelope).into_response().into_body();
    Response::from_parts(parts, body)
}
