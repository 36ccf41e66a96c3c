use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::json::parse_json;
use crate::error::AppError;

/// An uploaded file buffered in memory.
///
/// The request body limit bounds its size.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Multipart field name.
    pub field: String,
    /// File name as sent by the client.
    pub original_name: String,
    /// Declared content type.
    pub content_type: String,
    pub bytes: Bytes,
}

/// A body that may be `multipart/form-data` or JSON.
///
/// Text fields are collected into a JSON object so one `Deserialize` draft
/// serves both encodings. Repeated keys, and keys ending in `[]`, become
/// arrays. File fields are kept aside and claimed with [`FormBody::take_file`].
#[derive(Debug, Default)]
pub struct FormBody {
    fields: Map<String, Value>,
    files: Vec<FilePart>,
}

impl FormBody {
    /// Remove and return the uploaded file for `field`, if any.
    pub fn take_file(&mut self, field: &str) -> Option<FilePart> {
        let index = self.files.iter().position(|f| f.field == field)?;
        Some(self.files.swap_remove(index))
    }

    /// Deserialise the text fields into `T`.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` if the fields do not match `T`.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
    }

    fn insert_text(&mut self, name: &str, value: String) {
        let (key, is_array) = name
            .strip_suffix("[]")
            .map_or((name, false), |stripped| (stripped, true));

        match self.fields.get_mut(key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None if is_array => {
                self.fields
                    .insert(key.to_string(), Value::Array(vec![Value::String(value)]));
            }
            None => {
                self.fields.insert(key.to_string(), Value::String(value));
            }
        }
    }
}

impl<S> FromRequest<S> for FormBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with("multipart/form-data"));

        if !is_multipart {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            let fields = match parse_json::<Value>(&bytes)? {
                Value::Object(map) => map,
                _ => return Err(AppError::bad_request("Request body must be a JSON object")),
            };
            return Ok(Self {
                fields,
                files: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let mut body = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if let Some(original_name) = field.file_name().map(str::to_string) {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                // An untouched file input still submits an empty part
                if original_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                body.files.push(FilePart {
                    field: name,
                    original_name,
                    content_type,
                    bytes,
                });
            } else {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                body.insert_text(&name, text);
            }
        }

        Ok(body)
    }
}
