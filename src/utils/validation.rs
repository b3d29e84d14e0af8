use crate::models::employee::{DraftField, EmployeeDraft};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError, ValidationErrors};

pub(crate) static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
pub(crate) static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]+$").expect("phone pattern compiles"));

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Blank or whitespace-only text is missing. The message comes from the field attribute.
pub(crate) fn required_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(error("required", "Name is required"));
    }
    if name.chars().count() < 2 {
        return Err(error("length", "Name must be at least 2 characters"));
    }
    Ok(())
}

pub(crate) fn validate_salary(salary: f64) -> Result<(), ValidationError> {
    if !salary.is_finite() || salary <= 0.0 {
        return Err(error("range", "Salary must be greater than 0"));
    }
    Ok(())
}

/// Flattens validator output into one message per draft field. Checks run in
/// attribute order, so the first error is the one shown.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<DraftField, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let field = field.parse::<DraftField>().ok()?;
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field, message))
        })
        .collect()
}

/// Runs every check and returns the per-field messages; empty means valid.
pub fn validate_draft(draft: &EmployeeDraft) -> BTreeMap<DraftField, String> {
    match draft.validate() {
        Ok(()) => BTreeMap::new(),
        Err(errors) => field_messages(&errors),
    }
}
