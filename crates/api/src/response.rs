//! The JSON envelope shared by every endpoint.
//!
//! Success and failure responses have the same shape:
//!
//! ```json
//! { "success": true, "message": "Contact retrieved successfully", "data": { … }, "status": 200 }
//! ```
//!
//! Outside production, error envelopes also carry a `stack` field with the
//! debug rendering of the error (see [`crate::middleware::error_detail`]).

use std::borrow::Cow;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Wire shape of every response body.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Cow<'static, str>,
    pub data: T,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl<T> Envelope<T> {
    /// Build an envelope; `success` is derived from the status code.
    pub fn new(status: StatusCode, message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            success: !status.is_client_error() && !status.is_server_error(),
            message: message.into(),
            data,
            status: status.as_u16(),
            stack: None,
        }
    }
}

/// A successful handler result rendered as an [`Envelope`].
///
/// Handlers with no payload use `()` as `T`, which serialises to `null`.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: Cow<'static, str>,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK.
    pub fn ok(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    /// 201 Created.
    pub fn created(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope::new(self.status, self.message, self.data);
        (self.status, Json(envelope)).into_response()
    }
}

/// Attached to error responses so outer middleware can re-render the body.
#[derive(Debug, Clone)]
pub struct RenderedError {
    pub envelope: Envelope<serde_json::Value>,
    pub detail: String,
}
