/// Input normalization and validation helpers
///
/// Request values are normalized (trimmed, emails lowercased) before they are
/// validated, so that validation always sees what will be stored.

use crate::services::ServiceError;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::sync::LazyLock;
use validator::ValidationErrors;

/// Basic `local@domain.tld` shape; no further RFC compliance is attempted.
pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Trims surrounding whitespace
pub fn normalize_text(value: &str) -> String {
    value.trim().to_string()
}

/// Trims surrounding whitespace and lowercases
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Trims an optional value, mapping blank strings to `None`
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Returns true if `value` has the basic `local@domain.tld` shape
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Parses a path identifier
///
/// Only a complete base-10 integer is accepted: `"12abc"` is rejected.
///
/// # Errors
///
/// Returns [`ServiceError::Validation`] naming the entity, e.g. `Invalid task ID`.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32, ServiceError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ServiceError::Validation(format!("Invalid {} ID", entity)))
}

/// Picks the first validation message, checking fields in `field_order`
///
/// `ValidationErrors` stores fields in a hash map; walking an explicit order
/// keeps the reported message stable.
pub fn first_error_message(errors: &ValidationErrors, field_order: &[&str]) -> String {
    let field_errors = errors.field_errors();

    field_order
        .iter()
        .filter_map(|field| field_errors.get(*field))
        .chain(field_errors.values())
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation failed".to_string())
}

/// Converts `ValidationErrors` into a [`ServiceError::Validation`]
pub fn into_service_error(errors: ValidationErrors, field_order: &[&str]) -> ServiceError {
    ServiceError::Validation(first_error_message(&errors, field_order))
}

/// Deserializes a field that distinguishes "absent" from "explicitly null"
///
/// Use together with `#[serde(default)]`: absent → `None`,
/// `null` → `Some(None)`, value → `Some(Some(value))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserializes a nullable user reference
///
/// Like [`double_option`], but also accepts an empty string as "clear" and a
/// numeric string as an id, matching what browser form clients send.
pub fn nullable_id<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i32),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(Some(None)),
        Some(RawId::Number(id)) => Ok(Some(Some(id))),
        Some(RawId::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(Some(None))
            } else {
                text.parse::<i32>()
                    .map(|id| Some(Some(id)))
                    .map_err(|_| serde::de::Error::custom(format!("invalid user id: {}", text)))
            }
        }
    }
}
