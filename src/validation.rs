//! Field-level validation for request payloads.
//!
//! Every create/update request implements [`Validate`]. Checks accumulate into a
//! [`ValidationErrors`] map so a form can show every problem at once instead of
//! the first one only.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use utoipa::ToSchema;

pub const MAX_NAME_LEN: usize = 256;
pub const MAX_SLUG_LEN: usize = 96;
pub const MAX_TEXT_LEN: usize = 10_000;
pub const MAX_ID_LEN: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub fn required_text(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    } else if trimmed.chars().count() > max {
        errors.add(field, format!("must be at most {max} characters"));
    }
}

pub fn optional_text(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max: usize) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.add(field, format!("must be at most {max} characters"));
        }
    }
}

pub fn slug(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.is_empty() {
        errors.add(field, "is required");
        return;
    }
    if value.len() > MAX_SLUG_LEN {
        errors.add(field, format!("must be at most {MAX_SLUG_LEN} characters"));
        return;
    }
    let well_formed = value
        .split('-')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
    if !well_formed {
        errors.add(
            field,
            "must contain lowercase letters and digits separated by single dashes",
        );
    }
}

pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) {
    let value = value.trim();
    let mut parts = value.split('@');
    let valid = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        _ => false,
    };
    if !valid {
        errors.add(field, "must be a valid email address");
    }
}

pub fn http_url(errors: &mut ValidationErrors, field: &str, value: &str) {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        _ => errors.add(field, "must be an absolute http(s) URL"),
    }
}

pub fn non_negative(errors: &mut ValidationErrors, field: &str, value: i64) {
    if value < 0 {
        errors.add(field, "must not be negative");
    }
}

pub fn positive(errors: &mut ValidationErrors, field: &str, value: i64) {
    if value <= 0 {
        errors.add(field, "must be greater than zero");
    }
}

pub fn currency(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_uppercase()) {
        errors.add(field, "must be a three-letter ISO 4217 code");
    }
}

pub fn id(errors: &mut ValidationErrors, field: &str, value: &str) {
    let valid = !value.is_empty()
        && value.len() <= MAX_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if !valid {
        errors.add(field, "must be a valid identifier");
    }
}

/// Validates a single identifier, typically a path parameter.
pub fn validate_id(field: &str, value: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    id(&mut errors, field, value);
    errors.into_result()
}

pub fn any_field_set(errors: &mut ValidationErrors, set: &[bool]) {
    if !set.iter().any(|s| *s) {
        errors.add("body", "No fields to update");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_every_failing_field() {
        let mut errors = ValidationErrors::new();
        required_text(&mut errors, "name", "   ", MAX_NAME_LEN);
        slug(&mut errors, "slug", "Not A Slug");
        non_negative(&mut errors, "price", -1);

        assert_eq!(errors.fields.len(), 3);
        assert_eq!(errors.field("name"), Some(&["is required".to_string()][..]));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn slug_rules() {
        for good in ["summer", "summer-2024", "a-b-c"] {
            let mut errors = ValidationErrors::new();
            slug(&mut errors, "slug", good);
            assert!(errors.is_empty(), "{good} should be accepted");
        }
        for bad in ["", "-lead", "trail-", "double--dash", "Upper", "under_score"] {
            let mut errors = ValidationErrors::new();
            slug(&mut errors, "slug", bad);
            assert!(!errors.is_empty(), "{bad} should be rejected");
        }
    }

    #[test]
    fn email_rules() {
        let mut errors = ValidationErrors::new();
        email(&mut errors, "email", "owner@shop.example");
        assert!(errors.is_empty());

        for bad in ["owner", "@shop.example", "owner@shop", "a@b@c.d", "o wner@shop.example"] {
            let mut errors = ValidationErrors::new();
            email(&mut errors, "email", bad);
            assert!(!errors.is_empty(), "{bad} should be rejected");
        }
    }

    #[test]
    fn url_and_currency_rules() {
        let mut errors = ValidationErrors::new();
        http_url(&mut errors, "url", "https://cdn.example.com/a.png");
        currency(&mut errors, "currency", "EUR");
        assert!(errors.is_empty());

        http_url(&mut errors, "url", "ftp://cdn.example.com/a.png");
        currency(&mut errors, "currency", "eur");
        assert_eq!(errors.fields.len(), 2);
    }

    #[test]
    fn id_rules() {
        assert!(validate_id("id", "3f2c9a0b1d2e4f5a8b7c6d5e4f3a2b1c").is_ok());
        assert!(validate_id("id", "").is_err());
        assert!(validate_id("id", "../etc").is_err());
        assert!(validate_id("id", &"x".repeat(MAX_ID_LEN + 1)).is_err());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "is required");
        errors.add("slug", "is required");
        assert_eq!(errors.to_string(), "name: is required; slug: is required");
    }
}
