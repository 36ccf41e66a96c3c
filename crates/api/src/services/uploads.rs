//! Local-disk storage for uploaded files.
//!
//! Files live under `<UPLOADS_DIR>/<category>/<uuid>.<ext>` and are served
//! read-only at `/uploads`. Database rows keep the relative path
//! (`resumes/<uuid>.pdf`) inside a [`StoredFile`].

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::extract::FilePart;
use crate::models::StoredFile;

const IMAGE_TYPES: &[(&str, &[&str])] = &[
    ("image/jpeg", &["jpg", "jpeg"]),
    ("image/png", &["png"]),
    ("image/webp", &["webp"]),
    ("image/gif", &["gif"]),
];

const DOCUMENT_TYPES: &[(&str, &[&str])] = &[
    ("application/pdf", &["pdf"]),
    ("application/msword", &["doc"]),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        &["docx"],
    ),
];

/// Errors from storing or reading uploads.
#[derive(Debug, Error)]
pub enum UploadError {
    /// File type is not accepted for this category.
    #[error("Unsupported file type for {field}: {content_type}")]
    UnsupportedType { field: String, content_type: String },

    /// The uploaded file has no content.
    #[error("Uploaded file for {0} is empty")]
    Empty(String),

    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where an upload goes and which types it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    /// Admin avatars.
    Profiles,
    /// Job application resumes.
    Resumes,
    /// Product and service images.
    Products,
}

impl UploadCategory {
    /// Directory name under the upload root.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Resumes => "resumes",
            Self::Products => "products",
        }
    }

    const fn allowed(self) -> &'static [(&'static str, &'static [&'static str])] {
        match self {
            Self::Profiles | Self::Products => IMAGE_TYPES,
            Self::Resumes => DOCUMENT_TYPES,
        }
    }

    /// Whether a file with this content type and extension may be stored.
    ///
    /// The extension must be allowed; the declared type must match it or be
    /// the generic `application/octet-stream` some clients send.
    fn accepts(self, content_type: &str, extension: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        self.allowed().iter().any(|(mime, extensions)| {
            extensions.contains(&extension)
                && (content_type == *mime || content_type == "application/octet-stream")
        })
    }
}

/// Upload storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The upload root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and every category directory.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a directory cannot be created.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        for category in [
            UploadCategory::Profiles,
            UploadCategory::Resumes,
            UploadCategory::Products,
        ] {
            tokio::fs::create_dir_all(self.root.join(category.dir())).await?;
        }
        Ok(())
    }

    /// Validate and write an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedType` or `Empty` for unacceptable files, `Io` if
    /// the write fails.
    pub async fn save(
        &self,
        category: UploadCategory,
        part: FilePart,
    ) -> Result<StoredFile, UploadError> {
        if part.bytes.is_empty() {
            return Err(UploadError::Empty(part.field));
        }

        let extension = sanitize_extension(&part.original_name);
        if !category.accepts(&part.content_type, &extension) {
            return Err(UploadError::UnsupportedType {
                field: part.field,
                content_type: part.content_type,
            });
        }

        let filename = format!("{}.{extension}", Uuid::new_v4());
        let dir = self.root.join(category.dir());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), &part.bytes).await?;

        tracing::debug!(category = category.dir(), %filename, size = part.bytes.len(), "Stored upload");

        Ok(StoredFile {
            path: format!("{}/{filename}", category.dir()),
            filename,
            original_name: sanitize_original_name(&part.original_name),
            size: part.bytes.len() as u64,
            mimetype: part.content_type,
        })
    }

    /// Map a stored relative path to a filesystem path inside the root.
    ///
    /// Returns `None` for absolute paths or paths that climb out of the root.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let relative = Path::new(relative.trim_start_matches("/uploads/"));
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (safe && relative.components().next().is_some()).then(|| self.root.join(relative))
    }

    /// Read a stored file; `Ok(None)` if it no longer exists.
    ///
    /// # Errors
    ///
    /// Returns `Io` for any failure other than the file being missing.
    pub async fn read(&self, relative: &str) -> Result<Option<Vec<u8>>, UploadError> {
        let Some(path) = self.resolve(relative) else {
            return Ok(None);
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file, logging instead of failing.
    pub async fn remove(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!(path = relative, "Refusing to remove upload outside root");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = relative, "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = relative, error = %e, "Failed to remove upload"),
        }
    }
}

/// Lowercased alphanumeric extension of `name`, or `bin`.
fn sanitize_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(char::is_ascii_alphanumeric)
                .take(10)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "bin".to_string())
}

/// Client file name without directories or control characters.
fn sanitize_original_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();
    if cleaned.trim().is_empty() {
        "file".to_string()
    } else {
        cleaned.trim().to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Bytes;

    fn part(field: &str, name: &str, content_type: &str, bytes: &'static [u8]) -> FilePart {
        FilePart {
            field: field.to_string(),
            original_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(bytes),
        }
    }

    #[test]
    fn test_sanitize_extension() {
        assert_eq!(sanitize_extension("Resume.PDF"), "pdf");
        assert_eq!(sanitize_extension("photo.j$p#g"), "jpg");
        assert_eq!(sanitize_extension("noext"), "bin");
        assert_eq!(sanitize_extension("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_sanitize_original_name() {
        assert_eq!(sanitize_original_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_original_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_original_name("a\u{0}b.pdf"), "ab.pdf");
        assert_eq!(sanitize_original_name("///"), "file");
    }

    #[test]
    fn test_category_accepts() {
        assert!(UploadCategory::Resumes.accepts("application/pdf", "pdf"));
        assert!(UploadCategory::Resumes.accepts("application/octet-stream", "docx"));
        assert!(!UploadCategory::Resumes.accepts("image/png", "png"));
        assert!(UploadCategory::Products.accepts("image/png", "png"));
        assert!(!UploadCategory::Products.accepts("image/png", "exe"));
        assert!(!UploadCategory::Profiles.accepts("text/html", "html"));
    }

    #[test]
    fn test_resolve_rejects_escape() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("resumes/a.pdf"),
            Some(PathBuf::from("/srv/uploads/resumes/a.pdf"))
        );
        assert_eq!(
            store.resolve("/uploads/profiles/b.png"),
            Some(PathBuf::from("/srv/uploads/profiles/b.png"))
        );
        assert!(store.resolve("../secrets").is_none());
        assert!(store.resolve("/etc/passwd").is_none());
        assert!(store.resolve("").is_none());
    }

    #[tokio::test]
    async fn test_save_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let stored = store
            .save(
                UploadCategory::Resumes,
                part("resume", "My CV.pdf", "application/pdf", b"%PDF-1.7"),
            )
            .await
            .unwrap();
        assert!(stored.path.starts_with("resumes/"));
        assert!(stored.filename.ends_with(".pdf"));
        assert_eq!(stored.original_name, "My CV.pdf");
        assert_eq!(stored.size, 8);

        let bytes = store.read(&stored.path).await.unwrap().unwrap();
        assert_eq!(bytes, b"%PDF-1.7");

        store.remove(&stored.path).await;
        assert!(store.read(&stored.path).await.unwrap().is_none());
        // Removing twice is harmless
        store.remove(&stored.path).await;
    }

    #[tokio::test]
    async fn test_save_rejects_wrong_type_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path());

        let err = store
            .save(
                UploadCategory::Products,
                part("image", "evil.svg", "image/svg+xml", b"<svg/>"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));

        let err = store
            .save(UploadCategory::Products, part("image", "a.png", "image/png", b""))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Empty(_)));
    }

    #[tokio::test]
    async fn test_ensure_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("nested"));
        store.ensure_dirs().await.unwrap();
        assert!(store.root().join("profiles").is_dir());
        assert!(store.root().join("resumes").is_dir());
        assert!(store.root().join("products").is_dir());
    }
}
