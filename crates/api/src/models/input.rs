//! Lenient input decoding and one-pass validation.
//!
//! Request drafts have every field optional so a single deserialisation
//! succeeds for JSON and multipart bodies alike; [`Violations`] then checks
//! the draft and reports every problem at once.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use corpsite_core::{Email, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, de};

use crate::error::AppError;

// =============================================================================
// Lenient field types
// =============================================================================

/// A list of strings sent as a JSON array or a comma-separated string.
///
/// Entries are trimmed and blanks dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl StringList {
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl<'de> Deserialize<'de> for StringList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Many(Vec<String>),
            One(String),
        }

        let items = match Raw::deserialize(deserializer)? {
            Raw::Many(items) => items,
            Raw::One(joined) => joined.split(',').map(str::to_string).collect(),
        };
        Ok(Self(
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ))
    }
}

/// Accept `true`/`false` as JSON booleans or form strings.
///
/// # Errors
///
/// Fails for any other value.
pub fn flex_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Bool(b)) => Ok(Some(b)),
        Some(Raw::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "on" | "yes" => Ok(Some(true)),
            "false" | "0" | "off" | "no" => Ok(Some(false)),
            other => Err(de::Error::custom(format!("invalid boolean: {other}"))),
        },
    }
}

/// Accept an integer as a JSON number or a string.
///
/// # Errors
///
/// Fails for non-integral values.
pub fn flex_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid integer: {s}"))),
    }
}

/// Accept a decimal as a JSON number or a string; blank means absent.
///
/// # Errors
///
/// Fails for non-numeric values.
pub fn flex_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Decimal>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(Decimal::from(n))),
        Some(Raw::Float(f)) => Decimal::try_from(f)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {f}"))),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => Decimal::from_str(s.trim())
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number: {s}"))),
    }
}

/// Parse a string into `T` via `FromStr`, treating blanks as absent.
///
/// Filters arrive as `"status": ""` from forms that have not picked a value.
///
/// # Errors
///
/// Propagates the `FromStr` error message.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
///
/// A bare date resolves to the start of that day, or to its last
/// microsecond when `end_of_day` is set, so date ranges are inclusive.
#[must_use]
pub fn parse_timestamp(raw: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?
    } else {
        NaiveTime::MIN
    };
    Some(date.and_time(time).and_utc())
}

// =============================================================================
// List parameters
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        })
    }
}

/// Parameters shared by every admin list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
    #[serde(deserialize_with = "flex_i64")]
    pub page: Option<i64>,
    #[serde(deserialize_with = "flex_i64")]
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ListParams {
    /// The clamped page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// The search term, if non-blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    /// Inclusive created-at bounds.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when a bound is not a valid date.
    pub fn date_range(&self) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), AppError> {
        let bound = |raw: Option<&str>, end: bool, name: &str| {
            non_blank(raw)
                .map(|s| {
                    parse_timestamp(s, end)
                        .ok_or_else(|| AppError::BadRequest(format!("{name} is not a valid date")))
                })
                .transpose()
        };
        Ok((
            bound(self.start_date.as_deref(), false, "startDate")?,
            bound(self.end_date.as_deref(), true, "endDate")?,
        ))
    }
}

/// A list body: shared parameters plus entity-specific filters `F`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRequest<F> {
    #[serde(flatten)]
    pub params: ListParams,
    #[serde(flatten)]
    pub filter: F,
}

/// `isActive` filter for the content entities.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveFilter {
    #[serde(deserialize_with = "flex_bool")]
    pub is_active: Option<bool>,
}

/// `Some(trimmed)` unless the value is missing or blank.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Validation
// =============================================================================

/// Collects validation failures so they can be reported together.
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Record `message` unless `ok` holds.
    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.push(message);
        }
    }

    /// A required, trimmed, non-blank string of at most `max` characters.
    ///
    /// Returns an empty string when a violation was recorded.
    pub fn text(&mut self, field: &str, value: Option<String>, max: usize) -> String {
        match value.as_deref().map(str::trim) {
            None | Some("") => {
                self.push(format!("{field} is required"));
                String::new()
            }
            Some(s) => {
                self.max_len(field, s, max);
                s.to_string()
            }
        }
    }

    /// An optional trimmed string; blank becomes `None`.
    pub fn optional_text(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let s = non_blank(value.as_deref())?;
        self.max_len(field, s, max);
        Some(s.to_string())
    }

    /// A required email, normalised to lowercase.
    pub fn email(&mut self, field: &str, value: Option<String>) -> String {
        match non_blank(value.as_deref()) {
            None => {
                self.push(format!("{field} is required"));
                String::new()
            }
            Some(raw) => match Email::parse(raw) {
                Ok(email) => email.into_inner(),
                Err(e) => {
                    self.push(format!("{field} is invalid: {e}"));
                    String::new()
                }
            },
        }
    }

    /// A required value of any type; `T::default()` when missing.
    pub fn require<T: Default>(&mut self, field: &str, value: Option<T>) -> T {
        value.unwrap_or_else(|| {
            self.push(format!("{field} is required"));
            T::default()
        })
    }

    /// A required non-negative decimal.
    pub fn amount(&mut self, field: &str, value: Option<Decimal>) -> Decimal {
        let amount = self.require(field, value);
        self.non_negative(field, Some(amount));
        amount
    }

    /// Record a failure if `value` is negative.
    pub fn non_negative(&mut self, field: &str, value: Option<Decimal>) {
        if value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            self.push(format!("{field} cannot be negative"));
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(format!("{field} cannot exceed {max} characters"));
        }
    }

    /// Whether no failure has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` or a `Validation` error listing every failure.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if any failure was recorded.
    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

/// Maximum length for free-text fields without a tighter limit.
pub const MAX_TEXT: usize = 5000;
/// Maximum length for short single-line fields.
pub const MAX_LINE: usize = 200;
