//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, error types and the state machine
//! trait that form the vocabulary of the gym management domain.

mod errors;
mod ids;
mod money;
mod pagination;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, DomainResult, ErrorCode, FieldError, ValidationError};
pub use ids::{
    AttendanceId, InvoiceId, PaymentId, PlanId, SubscriptionId, TrainerId, UserId,
    WorkoutSessionId,
};
pub use money::{Currency, Money};
pub use pagination::{PageRequest, PaginatedResult};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;

/// Trims a required text field, rejecting blank input.
pub(crate) fn required_text(field: &str, value: impl Into<String>) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
