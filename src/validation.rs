//! Field-level checks for request bodies.
//!
//! A [`Validator`] accumulates every broken rule of a payload so the client
//! receives all of them in one 400 response.

use email_address::EmailAddress;
use uuid::Uuid;

use crate::error::{AppError, AppResult, FieldError};

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: String) {
        match self.errors.iter_mut().find(|e| e.field_name == field) {
            Some(existing) => existing.property_errors.push(message),
            None => self.errors.push(FieldError::new(field, message)),
        }
    }

    /// Record a missing value and pass through whatever was present.
    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, format!("{} should not be null or undefined", field));
        }
        value
    }

    /// Check a string's length in characters, inclusive on both ends.
    pub fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        let Some(value) = value else { return };
        let len = value.chars().count();
        if len < min {
            self.add(
                field,
                format!("{} must be longer than or equal to {} characters", field, min),
            );
        }
        if len > max {
            self.add(
                field,
                format!("{} must be shorter than or equal to {} characters", field, max),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            if !EmailAddress::is_valid(value) {
                self.add(field, format!("{} must be an email", field));
            }
        }
    }

    /// Parse a UUID, recording a failure instead of returning it.
    pub fn uuid(&mut self, field: &str, value: Option<&str>) -> Option<Uuid> {
        let value = value?;
        match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            Err(_) => {
                self.add(field, format!("{} must be a UUID", field));
                None
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(v: Validator) -> Vec<FieldError> {
        match v.finish() {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_required() {
        let mut v = Validator::new();
        assert_eq!(v.required("title", Some("x")), Some("x"));
        assert!(v.is_valid());
        assert_eq!(v.required::<String>("title", None), None);
        assert_eq!(
            messages(v)[0].property_errors,
            vec!["title should not be null or undefined"]
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let mut v = Validator::new();
        v.length("pseudo", Some("ééé"), 1, 3);
        assert!(v.is_valid());

        v.length("pseudo", Some(""), 1, 3);
        v.length("pseudo", Some("abcd"), 1, 3);
        let errors = messages(v);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].property_errors.len(), 2);
    }

    #[test]
    fn test_email() {
        let mut v = Validator::new();
        v.email("mail", Some("ann@example.com"));
        v.email("mail", None);
        assert!(v.is_valid());

        v.email("mail", Some("not-an-email"));
        assert_eq!(messages(v)[0].property_errors, vec!["mail must be an email"]);
    }

    #[test]
    fn test_uuid() {
        let mut v = Validator::new();
        let id = Uuid::new_v4();
        assert_eq!(v.uuid("group_id", Some(id.to_string().as_str())), Some(id));
        assert_eq!(v.uuid("group_id", None), None);
        assert!(v.is_valid());

        assert_eq!(v.uuid("group_id", Some("42")), None);
        assert_eq!(messages(v)[0].field_name, "group_id");
    }
}
