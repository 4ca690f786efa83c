//! AttendanceRecord aggregate.
//!
//! One check-in/check-out span at the club. A member holds at most one open
//! record at a time; that rule spans records and is enforced by the check-in
//! handler through the repository.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    AttendanceId, DomainError, StateMachine, Timestamp, UserId, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Gym,
    Cardio,
    Strength,
    Yoga,
    Swimming,
    GroupClass,
    Other,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Gym => "gym",
            ActivityType::Cardio => "cardio",
            ActivityType::Strength => "strength",
            ActivityType::Yoga => "yoga",
            ActivityType::Swimming => "swimming",
            ActivityType::GroupClass => "group_class",
            ActivityType::Other => "other",
        }
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        ActivityType::Gym
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gym" => Ok(ActivityType::Gym),
            "cardio" => Ok(ActivityType::Cardio),
            "strength" => Ok(ActivityType::Strength),
            "yoga" => Ok(ActivityType::Yoga),
            "swimming" => Ok(ActivityType::Swimming),
            "group_class" => Ok(ActivityType::GroupClass),
            "other" => Ok(ActivityType::Other),
            other => Err(ValidationError::invalid_format(
                "activity_type",
                format!("unknown activity '{}'", other),
            )),
        }
    }
}

/// Whether a record still awaits its check-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceState {
    Open,
    Closed,
}

impl StateMachine for AttendanceState {
    const AGGREGATE: &'static str = "AttendanceRecord";

    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (AttendanceState::Open, AttendanceState::Closed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            AttendanceState::Open => vec![AttendanceState::Closed],
            AttendanceState::Closed => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    id: AttendanceId,
    user_id: UserId,
    activity_type: ActivityType,
    check_in_time: Timestamp,
    check_out_time: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl AttendanceRecord {
    /// Opens a new record at `at`.
    pub fn check_in(user_id: UserId, activity_type: ActivityType, at: Timestamp) -> Self {
        let now = Timestamp::now();
        Self {
            id: AttendanceId::new(),
            user_id,
            activity_type,
            check_in_time: at,
            check_out_time: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a record from persistence (no validation).
    pub fn reconstitute(
        id: AttendanceId,
        user_id: UserId,
        activity_type: ActivityType,
        check_in_time: Timestamp,
        check_out_time: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            activity_type,
            check_in_time,
            check_out_time,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &AttendanceId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    pub fn check_in_time(&self) -> &Timestamp {
        &self.check_in_time
    }

    pub fn check_out_time(&self) -> Option<&Timestamp> {
        self.check_out_time.as_ref()
    }

    pub fn state(&self) -> AttendanceState {
        if self.check_out_time.is_some() {
            AttendanceState::Closed
        } else {
            AttendanceState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == AttendanceState::Open
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Time spent at the club. `None` while still checked in.
    pub fn duration(&self) -> Option<Duration> {
        self.check_out_time
            .map(|out| out.duration_since(&self.check_in_time))
    }

    /// Closes the record.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if already checked out
    /// - `ValidationFailed` if `at` precedes the check-in time
    pub fn check_out(&mut self, at: Timestamp) -> Result<(), DomainError> {
        self.state().transition_to(AttendanceState::Closed, "check out")?;
        if at.is_before(&self.check_in_time) {
            return Err(DomainError::validation(
                "check_out_time",
                "Check-out cannot precede check-in",
            ));
        }
        self.check_out_time = Some(at);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn check_in_opens_record() {
        let record = AttendanceRecord::check_in(UserId::new(), ActivityType::Yoga, Timestamp::now());
        assert!(record.is_open());
        assert!(record.duration().is_none());
    }

    #[test]
    fn check_out_closes_and_measures_duration() {
        let start = Timestamp::now().add_minutes(-90);
        let mut record = AttendanceRecord::check_in(UserId::new(), ActivityType::Gym, start);

        record.check_out(start.add_minutes(90)).unwrap();

        assert_eq!(record.state(), AttendanceState::Closed);
        assert_eq!(record.duration().unwrap().num_minutes(), 90);
    }

    #[test]
    fn second_check_out_conflicts() {
        let mut record = AttendanceRecord::check_in(UserId::new(), ActivityType::Gym, Timestamp::now());
        record.check_out(Timestamp::now()).unwrap();
        let first_out = *record.check_out_time().unwrap();

        let err = record.check_out(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Closed"));
        assert_eq!(record.check_out_time(), Some(&first_out));
    }

    #[test]
    fn check_out_before_check_in_is_invalid() {
        let start = Timestamp::now();
        let mut record = AttendanceRecord::check_in(UserId::new(), ActivityType::Gym, start);
        let err = record.check_out(start.add_minutes(-5)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(record.is_open());
    }

    #[test]
    fn activity_type_parses_stored_form() {
        for activity in [ActivityType::GroupClass, ActivityType::Swimming, ActivityType::Other] {
            assert_eq!(activity.as_str().parse::<ActivityType>().unwrap(), activity);
        }
        assert!("boxing".parse::<ActivityType>().is_err());
    }
}
