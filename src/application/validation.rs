//! Validation gate.
//!
//! Every request declares its input rules through [`Validate`]. The
//! dispatcher runs the gate before any handler is built; a request with
//! field errors never reaches the core.

use crate::domain::foundation::{DomainError, FieldError, ValidationError};
use crate::domain::user::normalize_email;

/// Input rules for one request type.
pub trait Validate {
    /// Returns every field error; empty means the request may proceed.
    fn validate(&self) -> Vec<FieldError>;
}

/// Runs the gate, folding all field errors into one `ValidationFailed`.
pub fn ensure_valid<T: Validate + ?Sized>(request: &T) -> Result<(), DomainError> {
    let errors = request.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation_failures(errors))
    }
}

/// Accumulates field errors.
///
/// ```ignore
/// let mut rules = Rules::new();
/// rules.required("title", &self.title).max_length("title", &self.title, 200);
/// rules.finish()
/// ```
#[derive(Debug, Default)]
pub struct Rules {
    errors: Vec<FieldError>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(field, !value.trim().is_empty(), "is required")
    }

    pub fn max_length(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        let ok = value.trim().chars().count() <= max;
        self.check(field, ok, &format!("must be at most {} characters", max))
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if let Err(err) = normalize_email(value) {
            self.errors.push(FieldError::new(field, err.to_string()));
        }
        self
    }

    pub fn range(&mut self, field: &str, value: i64, min: i64, max: i64) -> &mut Self {
        let ok = (min..=max).contains(&value);
        self.check(field, ok, &format!("must be between {} and {}", min, max))
    }

    /// Records the error of a value-object constructor, if any.
    pub fn parsed<T>(&mut self, result: Result<T, ValidationError>) -> &mut Self {
        if let Err(err) = result {
            self.errors.push(err.into());
        }
        self
    }

    /// Like [`Rules::parsed`], reporting the error under `field` instead of
    /// the value object's own field name.
    pub fn parsed_as<T>(&mut self, field: &str, result: Result<T, ValidationError>) -> &mut Self {
        if let Err(err) = result {
            self.errors.push(FieldError::new(field, err.to_string()));
        }
        self
    }

    pub fn finish(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    struct Signup {
        name: String,
        email: String,
        age: i64,
    }

    impl Validate for Signup {
        fn validate(&self) -> Vec<FieldError> {
            Rules::new()
                .required("name", &self.name)
                .max_length("name", &self.name, 5)
                .email("email", &self.email)
                .range("age", self.age, 13, 120)
                .finish()
        }
    }

    #[test]
    fn valid_request_passes_gate() {
        let request = Signup {
            name: "Ali".to_string(),
            email: "ali@example.com".to_string(),
            age: 30,
        };
        assert!(ensure_valid(&request).is_ok());
    }

    #[test]
    fn gate_reports_every_failed_field() {
        let request = Signup {
            name: String::new(),
            email: "nope".to_string(),
            age: 5,
        };

        let err = ensure_valid(&request).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.contains_key("name"));
        assert!(err.details.contains_key("email"));
        assert!(err.details.contains_key("age"));
    }

    #[test]
    fn parsed_records_constructor_errors() {
        let errors = Rules::new()
            .parsed(crate::domain::foundation::Currency::new("RIYAL"))
            .finish();
        assert_eq!(errors.len(), 1);
    }
}
