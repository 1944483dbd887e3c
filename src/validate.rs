// ABOUTME: Field validation for request payloads
// ABOUTME: Collects length, range, URL and email violations into a single 422 error

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{AppError, FieldError, Result};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accumulates field errors; `finish` turns them into a validation error.
#[derive(Debug, Default)]
pub struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: String) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Character count bounds, inclusive. `max` of `None` means unbounded.
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: Option<usize>) -> &mut Self {
        let count = value.chars().count();
        if count < min {
            self.fail(field, format!("must be at least {} characters", min));
        } else if let Some(max) = max {
            if count > max {
                self.fail(field, format!("must be at most {} characters", max));
            }
        }
        self
    }

    pub fn optional_length(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: Option<usize>,
    ) -> &mut Self {
        if let Some(value) = value {
            self.length(field, value, min, max);
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                self.fail(field, "must be a valid URL".to_string());
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if !EMAIL_PATTERN.is_match(value) {
                self.fail(field, "invalid email format".to_string());
            }
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        if let Some(value) = value {
            if value < 0 {
                self.fail(field, "must be greater than or equal to 0".to_string());
            }
        }
        self
    }

    pub fn range(&mut self, field: &str, value: u64, min: u64, max: u64) -> &mut Self {
        if value < min {
            self.fail(field, format!("must be greater than or equal to {}", min));
        } else if value > max {
            self.fail(field, format!("must be less than or equal to {}", max));
        }
        self
    }

    pub fn finish(&mut self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_counts_characters() {
        let mut checks = Checks::new();
        checks.length("title", "été", 1, Some(3));
        assert!(checks.finish().is_ok());

        checks.length("title", "", 1, Some(3));
        checks.length("bio", "short", 10, None);
        match checks.finish() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].field, "title");
                assert_eq!(errors[1].message, "must be at least 10 characters");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_url_and_email() {
        let mut checks = Checks::new();
        checks
            .url("website", Some("https://www.mit.edu"))
            .url("website", None)
            .email("email", Some("student@medicaps.ac.in"));
        assert!(checks.finish().is_ok());

        checks
            .url("applicationLink", Some("forms.google.com"))
            .email("email", Some("not-an-email"));
        assert!(checks.finish().is_err());
    }
}
