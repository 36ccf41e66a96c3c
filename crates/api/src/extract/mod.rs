//! Request extractors that reject with the JSON envelope.
//!
//! Axum's built-in extractors reject with plain-text bodies. These wrappers
//! turn every rejection into an [`AppError::BadRequest`](crate::error::AppError)
//! so clients always receive the canonical envelope.

mod form;
mod json;
mod path;
mod query;

pub use form::{FilePart, FormBody};
pub use json::JsonBody;
pub use path::IdPath;
pub use query::QueryParams;
