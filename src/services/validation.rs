//! Input validation rules for admin payloads

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppResult, ValidationErrors};

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("valid email regex")
});

/// `password_confirmation` -> `password confirmation`
fn display(field: &str) -> String {
    field.replace('_', " ")
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", display(field))
}

pub fn unique_message(field: &str) -> String {
    format!("The {} has already been taken.", display(field))
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Treat `None` and whitespace-only strings alike.
pub fn filled(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Collects failures for one payload; [`Validator::finish`] reports them all.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value when present so later rules can chain on it.
    pub fn required<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        let value = filled(value);
        if value.is_none() {
            self.errors.add(field, required_message(field));
        }
        value
    }

    pub fn required_value<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.errors.add(field, required_message(field));
        }
        value
    }

    pub fn email(&mut self, field: &str, value: &str) -> bool {
        let ok = is_valid_email(value.trim());
        if !ok {
            self.errors.add(
                field,
                format!("The {} must be a valid email address.", display(field)),
            );
        }
        ok
    }

    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> bool {
        let ok = value.chars().count() >= min;
        if !ok {
            self.errors.add(
                field,
                format!(
                    "The {} must be at least {} characters.",
                    display(field),
                    min
                ),
            );
        }
        ok
    }

    /// `required_with:other|same:other`
    pub fn confirmed(
        &mut self,
        field: &str,
        value: Option<&str>,
        other_field: &str,
        other: Option<&str>,
    ) {
        let Some(other) = filled(other) else {
            return;
        };
        match filled(value) {
            None => self.errors.add(
                field,
                format!(
                    "The {} field is required when {} is present.",
                    display(field),
                    display(other_field)
                ),
            ),
            Some(value) if value != other => self.errors.add(
                field,
                format!(
                    "The {} and {} must match.",
                    display(field),
                    display(other_field)
                ),
            ),
            Some(_) => {}
        }
    }

    pub fn unique(&mut self, field: &str, taken: bool) {
        if taken {
            self.errors.add(field, unique_message(field));
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.has(field)
    }

    pub fn finish(self) -> AppResult<()> {
        self.errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use assert_matches::assert_matches;

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("admin@example.com"));
        assert!(is_valid_email("first.last+tag@shop.co.uk"));
        assert!(!is_valid_email("admin@"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_required_treats_blank_as_missing() {
        let mut v = Validator::new();
        assert_eq!(v.required("name", Some("  ")), None);
        assert_eq!(v.required("email", Some("a@b.co")), Some("a@b.co"));
        assert!(v.has_error("name"));
        assert!(!v.has_error("email"));
    }

    #[test]
    fn test_confirmation_rules() {
        let mut v = Validator::new();
        v.confirmed("password_confirmation", None, "password", None);
        assert!(!v.has_error("password_confirmation"));

        v.confirmed("password_confirmation", None, "password", Some("secret1"));
        let err = v.finish().unwrap_err();
        assert_matches!(&err, AppError::Validation(e) if e.field("password_confirmation")
            == ["The password confirmation field is required when password is present."]);

        let mut v = Validator::new();
        v.confirmed("password_confirmation", Some("secret2"), "password", Some("secret1"));
        assert!(v.has_error("password_confirmation"));
    }

    #[test]
    fn test_min_length_counts_characters() {
        let mut v = Validator::new();
        assert!(v.min_length("password", "päßwör", 6));
        assert!(!v.min_length("password", "12345", 6));
        assert!(v.has_error("password"));
    }
}
