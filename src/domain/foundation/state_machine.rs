//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across the aggregate lifecycle statuses (User, WorkoutSession, Payment, ...).

use std::fmt::Debug;

use super::DomainError;

/// Trait for status enums that represent state machines.
///
/// Implementors declare the legal transition table and get a checked
/// `transition_to` that reports `ConflictingState` for everything else.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for WorkoutStatus {
///     const AGGREGATE: &'static str = "WorkoutSession";
///
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Scheduled, InProgress) | (InProgress, Completed))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> { /* ... */ }
/// }
///
/// let next = session.status.transition_to(WorkoutStatus::InProgress, "start")?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug {
    /// Aggregate name reported in conflict errors.
    const AGGREGATE: &'static str;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning `ConflictingState` if invalid.
    ///
    /// `action` names the attempted behavior (e.g. "refund") for the error.
    fn transition_to(&self, target: Self, action: &str) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::conflicting_state(Self::AGGREGATE, self, action))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Closed,
    }

    impl StateMachine for TestStatus {
        const AGGREGATE: &'static str = "Test";

        fn can_transition_to(&self, target: &Self) -> bool {
            use TestStatus::*;
            matches!((self, target), (Draft, Active) | (Active, Closed))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Draft => vec![Active],
                Active => vec![Closed],
                Closed => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        let result = TestStatus::Draft.transition_to(TestStatus::Active, "activate");
        assert_eq!(result, Ok(TestStatus::Active));
    }

    #[test]
    fn transition_to_reports_conflicting_state() {
        let err = TestStatus::Draft
            .transition_to(TestStatus::Closed, "close")
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("aggregate"), Some("Test"));
        assert_eq!(err.detail("current_status"), Some("Draft"));
        assert_eq!(err.detail("attempted_action"), Some("close"));
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(TestStatus::Closed.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in [TestStatus::Draft, TestStatus::Active, TestStatus::Closed] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }
}
