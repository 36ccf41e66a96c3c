//! Domain models and request drafts for the back-office API.

pub mod admin;
pub mod catalog;
pub mod contact;
pub mod hire_developer;
pub mod input;
pub mod job_application;
pub mod lead;
pub mod open_position;
pub mod reseller;
pub mod stats;
pub mod testimonial;

use serde::{Deserialize, Serialize};

pub use admin::{Admin, AdminCredentials, NewAdmin, ProfileChanges};
pub use catalog::{CatalogItem, CatalogKind, ProductKind, ServiceKind};
pub use contact::Contact;
pub use hire_developer::HireDeveloper;
pub use job_application::JobApplication;
pub use open_position::OpenPosition;
pub use reseller::Reseller;
pub use testimonial::Testimonial;

/// Metadata for a file written by the upload store.
///
/// Persisted as JSONB; `path` is relative to the upload root and is served
/// under `/uploads/<path>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Generated file name on disk.
    pub filename: String,
    /// Client-supplied name, sanitised.
    pub original_name: String,
    /// `<category>/<filename>`.
    pub path: String,
    /// Size in bytes.
    pub size: u64,
    /// Declared content type.
    pub mimetype: String,
}
