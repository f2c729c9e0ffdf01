use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Returns the trimmed input, or records `"{label} is required."` when it is absent or blank.
pub(crate) fn required(input: Option<&str>, label: &str, errors: &mut Vec<String>) -> String {
    match input.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => {
            errors.push(format!("{label} is required."));
            String::new()
        }
    }
}

/// Like [`required`] but returns the input untouched. Used for secrets, where
/// surrounding whitespace is part of the value.
pub(crate) fn required_verbatim(input: Option<&str>, label: &str, errors: &mut Vec<String>) -> String {
    match input {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => {
            errors.push(format!("{label} is required."));
            String::new()
        }
    }
}

/// Trims optional free text; blank input is stored as `None`.
pub(crate) fn optional(input: Option<String>) -> Option<String> {
    input
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn finish(errors: Vec<String>) -> AppResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}
