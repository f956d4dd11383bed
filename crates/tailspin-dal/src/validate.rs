//! Field length rules shared by the catalog entities.
//!
//! The checks are plain functions, so they can run both inside garde derived
//! validators (on create payloads) and field by field during partial updates.

use std::fmt::Display;

pub const TITLE_LABEL: &str = "Game title";
pub const TITLE_MIN_LENGTH: usize = 2;
pub const DESCRIPTION_LABEL: &str = "Description";
pub const DESCRIPTION_MIN_LENGTH: usize = 10;
pub const NAME_LABEL: &str = "Name";
pub const NAME_MIN_LENGTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Keeps the first reported message, the field path is not part of it
impl From<garde::Report> for ValidationError {
    fn from(report: garde::Report) -> Self {
        match report.iter().next() {
            Some((_path, error)) => ValidationError::new(error.message()),
            None => ValidationError::new("Validation failed"),
        }
    }
}

/// Checks that `value` has at least `min_length` characters.
///
/// A missing value passes only when `allow_none` is set. Length is counted in
/// characters, not bytes.
pub fn validate_string_length<'a>(
    field_label: &str,
    value: Option<&'a str>,
    min_length: usize,
    allow_none: bool,
) -> Result<Option<&'a str>, ValidationError> {
    match value {
        None if allow_none => Ok(None),
        Some(v) if v.chars().count() >= min_length => Ok(Some(v)),
        _ => Err(ValidationError::new(format!(
            "{field_label} must be at least {min_length} characters"
        ))),
    }
}

pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    validate_string_length(TITLE_LABEL, Some(title), TITLE_MIN_LENGTH, false).map(|_| title)
}

// Column is NOT NULL, yet a null description is let through unchecked and left
// to the storage layer. Needs product clarification before enforcing.
pub fn validate_description(description: Option<&str>) -> Result<Option<&str>, ValidationError> {
    match description {
        Some(_) => validate_string_length(
            DESCRIPTION_LABEL,
            description,
            DESCRIPTION_MIN_LENGTH,
            true,
        ),
        None => Ok(None),
    }
}

pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    validate_string_length(NAME_LABEL, Some(name), NAME_MIN_LENGTH, false).map(|_| name)
}

pub(crate) fn valid_title(value: &str, _ctx: &()) -> garde::Result {
    validate_title(value)
        .map(|_| ())
        .map_err(|e| garde::Error::new(e.message))
}

pub(crate) fn valid_description(value: &Option<String>, _ctx: &()) -> garde::Result {
    validate_description(value.as_deref())
        .map(|_| ())
        .map_err(|e| garde::Error::new(e.message))
}

pub(crate) fn valid_name(value: &str, _ctx: &()) -> garde::Result {
    validate_name(value)
        .map(|_| ())
        .map_err(|e| garde::Error::new(e.message))
}
