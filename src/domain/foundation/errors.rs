//! Error types for the domain layer.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// A single field-level message produced by the validation gate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError::new(err.field().to_string(), err.to_string())
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input errors
    ValidationFailed,

    // Lookup errors
    NotFound,

    // State errors
    ConflictingState,
    DuplicateConstraint,
    ConcurrencyConflict,

    // Infrastructure errors
    DatabaseError,
    NotificationFailed,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ConflictingState => "CONFLICTING_STATE",
            ErrorCode::DuplicateConstraint => "DUPLICATE_CONSTRAINT",
            ErrorCode::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotificationFailed => "NOTIFICATION_FAILED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Every aggregate behavior, repository call and handler reports failure
/// through this one type so callers can map it to their transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

/// Shorthand for results carrying a [`DomainError`].
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(ErrorCode::ValidationFailed, message.clone()).with_detail(field, message)
    }

    /// Creates a validation error carrying every failed field.
    pub fn validation_failures(errors: Vec<FieldError>) -> Self {
        let summary = errors
            .iter()
            .map(|e| e.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut err = Self::new(
            ErrorCode::ValidationFailed,
            format!("Validation failed for: {}", summary),
        );
        for e in errors {
            err.details.insert(e.field, e.message);
        }
        err
    }

    /// The referenced entity does not exist.
    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NotFound, format!("{} '{}' was not found", entity, id))
            .with_detail("entity", entity)
            .with_detail("id", id.to_string())
    }

    /// The aggregate's current status forbids the attempted action.
    pub fn conflicting_state(
        aggregate: &str,
        current_status: impl fmt::Debug,
        attempted_action: &str,
    ) -> Self {
        let current = format!("{:?}", current_status);
        Self::new(
            ErrorCode::ConflictingState,
            format!(
                "Cannot {} {} while it is {}",
                attempted_action, aggregate, current
            ),
        )
        .with_detail("aggregate", aggregate)
        .with_detail("current_status", current)
        .with_detail("attempted_action", attempted_action)
    }

    /// A uniqueness rule was violated.
    pub fn duplicate(field: &str, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DuplicateConstraint,
            format!("{} '{}' is already in use", field, value),
        )
        .with_detail("field", field)
        .with_detail("value", value.to_string())
    }

    /// Another writer committed a conflicting change first.
    pub fn concurrency_conflict(entity: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::ConcurrencyConflict,
            format!("{} '{}' was modified by a concurrent request", entity, id),
        )
        .with_detail("entity", entity)
        .with_detail("id", id.to_string())
    }

    /// Storage failure.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Unexpected failure (programming errors, broken invariants).
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Returns a detail value by key.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::NotFound
    }

    pub fn is_conflicting_state(&self) -> bool {
        self.code == ErrorCode::ConflictingState
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.field().to_string(), err.to_string())
    }
}
