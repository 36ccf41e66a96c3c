//! Products and services.
//!
//! Both are catalogue entries with a title, description, optional image and a
//! list of selling points. They differ only in table, the name of that list
//! (`benefits` for products, `features` for services) and their ID type, so
//! one generic implementation serves both through [`CatalogKind`].

use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use corpsite_core::{ProductId, ServiceId};

use super::StoredFile;
use super::input::{MAX_LINE, MAX_TEXT, StringList, Violations, flex_bool};
use crate::error::AppError;

/// Static description of a catalogue entity.
pub trait CatalogKind: Send + Sync + 'static {
    /// Typed primary key.
    type Id: Copy
        + Debug
        + Display
        + FromStr
        + From<i32>
        + Into<i32>
        + Serialize
        + Send
        + Sync
        + 'static;

    /// Schema-qualified table name.
    const TABLE: &'static str;
    /// Column and JSON key of the selling-point list.
    const LIST_FIELD: &'static str;
    /// Singular display name used in messages.
    const NAME: &'static str;
    /// Plural display name used in messages.
    const PLURAL: &'static str;
}

/// Marker for products.
#[derive(Debug, Clone, Copy)]
pub enum ProductKind {}

impl CatalogKind for ProductKind {
    type Id = ProductId;
    const TABLE: &'static str = "site.products";
    const LIST_FIELD: &'static str = "benefits";
    const NAME: &'static str = "Product";
    const PLURAL: &'static str = "Products";
}

/// Marker for services.
#[derive(Debug, Clone, Copy)]
pub enum ServiceKind {}

impl CatalogKind for ServiceKind {
    type Id = ServiceId;
    const TABLE: &'static str = "site.services";
    const LIST_FIELD: &'static str = "features";
    const NAME: &'static str = "Service";
    const PLURAL: &'static str = "Services";
}

/// A product or service.
pub struct CatalogItem<K: CatalogKind> {
    pub id: K::Id,
    pub title: String,
    pub description: String,
    /// `benefits` or `features`, per [`CatalogKind::LIST_FIELD`].
    pub points: Vec<String>,
    pub image: Option<StoredFile>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<K: CatalogKind> Debug for CatalogItem<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(K::NAME)
            .field("id", &self.id)
            .field("title", &self.title)
            .field("is_active", &self.is_active)
            .finish_non_exhaustive()
    }
}

impl<K: CatalogKind> Serialize for CatalogItem<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct(K::NAME, 8)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("description", &self.description)?;
        s.serialize_field(K::LIST_FIELD, &self.points)?;
        s.serialize_field("image", &self.image)?;
        s.serialize_field("isActive", &self.is_active)?;
        s.serialize_field("createdAt", &self.created_at)?;
        s.serialize_field("updatedAt", &self.updated_at)?;
        s.end()
    }
}

/// The public-site view of a catalogue entry, without `isActive`.
pub struct PublicCatalogItem<K: CatalogKind>(pub CatalogItem<K>);

impl<K: CatalogKind> Serialize for PublicCatalogItem<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let item = &self.0;
        let mut s = serializer.serialize_struct(K::NAME, 7)?;
        s.serialize_field("id", &item.id)?;
        s.serialize_field("title", &item.title)?;
        s.serialize_field("description", &item.description)?;
        s.serialize_field(K::LIST_FIELD, &item.points)?;
        s.serialize_field("image", &item.image)?;
        s.serialize_field("createdAt", &item.created_at)?;
        s.serialize_field("updatedAt", &item.updated_at)?;
        s.end()
    }
}

/// Create and update fields. The image arrives as a file part.
///
/// Both list names are accepted; only the one matching the kind is used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<StringList>,
    pub features: Option<StringList>,
    #[serde(deserialize_with = "flex_bool")]
    pub is_active: Option<bool>,
}

/// Validated catalogue fields. `None` leaves a column unchanged on update.
pub struct CatalogFields<K> {
    pub title: Option<String>,
    pub description: Option<String>,
    pub points: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub image: Option<StoredFile>,
    kind: PhantomData<K>,
}

impl<K> Debug for CatalogFields<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogFields")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("points", &self.points)
            .field("is_active", &self.is_active)
            .field("image", &self.image)
            .finish()
    }
}

impl CatalogDraft {
    /// Validate a new entry; title and description are required.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_new<K: CatalogKind>(self) -> Result<CatalogFields<K>, AppError> {
        self.validate(true)
    }

    /// Validate a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` listing every problem.
    pub fn validate_patch<K: CatalogKind>(self) -> Result<CatalogFields<K>, AppError> {
        self.validate(false)
    }

    fn validate<K: CatalogKind>(self, creating: bool) -> Result<CatalogFields<K>, AppError> {
        let mut v = Violations::new();
        let (title, description) = if creating {
            (
                Some(v.text("title", self.title, MAX_LINE)),
                Some(v.text("description", self.description, MAX_TEXT)),
            )
        } else {
            (
                v.optional_text("title", self.title, MAX_LINE),
                v.optional_text("description", self.description, MAX_TEXT),
            )
        };

        let list = if K::LIST_FIELD == "features" {
            self.features
        } else {
            self.benefits
        };
        let points = list.map(StringList::into_inner);
        if let Some(points) = &points {
            v.check(
                points.iter().all(|p| p.chars().count() <= MAX_LINE),
                format!("{} entries cannot exceed {MAX_LINE} characters", K::LIST_FIELD),
            );
        }
        v.finish()?;

        Ok(CatalogFields {
            title,
            description,
            points: if creating {
                Some(points.unwrap_or_default())
            } else {
                points
            },
            is_active: self.is_active,
            image: None,
            kind: PhantomData,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item<K: CatalogKind>(id: i32) -> CatalogItem<K> {
        CatalogItem {
            id: K::Id::from(id),
            title: "Widget".into(),
            description: "Does things".into(),
            points: vec!["fast".into()],
            image: None,
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_list_field_follows_kind() {
        let product = serde_json::to_value(item::<ProductKind>(1)).unwrap();
        assert_eq!(product["benefits"], serde_json::json!(["fast"]));
        assert!(product.get("features").is_none());

        let service = serde_json::to_value(item::<ServiceKind>(2)).unwrap();
        assert_eq!(service["features"], serde_json::json!(["fast"]));
        assert_eq!(service["isActive"], false);
    }

    #[test]
    fn test_public_view_hides_visibility() {
        let json = serde_json::to_value(PublicCatalogItem(item::<ProductKind>(1))).unwrap();
        assert!(json.get("isActive").is_none());
        assert_eq!(json["title"], "Widget");
    }

    #[test]
    fn test_draft_picks_kind_list() {
        let draft: CatalogDraft = serde_json::from_value(serde_json::json!({
            "title": "Consulting",
            "description": "Advice",
            "features": "audit, roadmap",
            "benefits": ["ignored"]
        }))
        .unwrap();
        let fields = draft.validate_new::<ServiceKind>().unwrap();
        assert_eq!(fields.points, Some(vec!["audit".into(), "roadmap".into()]));
    }

    #[test]
    fn test_create_requires_title_and_description() {
        let err = CatalogDraft::default().validate_new::<ProductKind>().unwrap_err();
        let AppError::Validation(messages) = err else {
            panic!("expected validation error");
        };
        assert_eq!(messages, vec!["title is required", "description is required"]);
    }

    #[test]
    fn test_patch_leaves_points_untouched() {
        let draft: CatalogDraft =
            serde_json::from_value(serde_json::json!({"isActive": "true"})).unwrap();
        let fields = draft.validate_patch::<ProductKind>().unwrap();
        assert!(fields.points.is_none());
        assert!(fields.title.is_none());
        assert_eq!(fields.is_active, Some(true));
    }
}
