//! WorkoutSession aggregate and its status.
//!
//! ```text
//! Scheduled --start--> InProgress --complete--> Completed
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    optional_text, required_text, DomainError, StateMachine, Timestamp, TrainerId, UserId,
    ValidationError, WorkoutSessionId,
};

pub const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl WorkoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutStatus::Scheduled => "scheduled",
            WorkoutStatus::InProgress => "in_progress",
            WorkoutStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "scheduled" => Some(WorkoutStatus::Scheduled),
            "in_progress" => Some(WorkoutStatus::InProgress),
            "completed" => Some(WorkoutStatus::Completed),
            _ => None,
        }
    }
}

impl StateMachine for WorkoutStatus {
    const AGGREGATE: &'static str = "WorkoutSession";

    fn can_transition_to(&self, target: &Self) -> bool {
        use WorkoutStatus::*;
        matches!((self, target), (Scheduled, InProgress) | (InProgress, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WorkoutStatus::*;
        match self {
            Scheduled => vec![InProgress],
            InProgress => vec![Completed],
            Completed => vec![],
        }
    }
}

/// A training session booked by a member, optionally with a trainer.
///
/// `start_time` is the booked slot. `started_at` and `end_time` record what
/// actually happened and are only set by `start` and `complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    id: WorkoutSessionId,
    user_id: UserId,
    trainer_id: Option<TrainerId>,
    title: String,
    description: Option<String>,
    start_time: Timestamp,
    started_at: Option<Timestamp>,
    end_time: Option<Timestamp>,
    status: WorkoutStatus,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl WorkoutSession {
    /// Books a new session in `Scheduled` state.
    pub fn schedule(
        user_id: UserId,
        trainer_id: Option<TrainerId>,
        title: impl Into<String>,
        description: Option<String>,
        start_time: Timestamp,
    ) -> Result<Self, DomainError> {
        let title = required_text("title", title)?;
        let len = title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(
                ValidationError::out_of_range("title", 1, MAX_TITLE_LENGTH as i64, len as i64).into(),
            );
        }

        let now = Timestamp::now();
        Ok(Self {
            id: WorkoutSessionId::new(),
            user_id,
            trainer_id,
            title,
            description: optional_text(description),
            start_time,
            started_at: None,
            end_time: None,
            status: WorkoutStatus::Scheduled,
            notes: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: WorkoutSessionId,
        user_id: UserId,
        trainer_id: Option<TrainerId>,
        title: String,
        description: Option<String>,
        start_time: Timestamp,
        started_at: Option<Timestamp>,
        end_time: Option<Timestamp>,
        status: WorkoutStatus,
        notes: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            trainer_id,
            title,
            description,
            start_time,
            started_at,
            end_time,
            status,
            notes,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &WorkoutSessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn trainer_id(&self) -> Option<&TrainerId> {
        self.trainer_id.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn start_time(&self) -> &Timestamp {
        &self.start_time
    }

    pub fn started_at(&self) -> Option<&Timestamp> {
        self.started_at.as_ref()
    }

    pub fn end_time(&self) -> Option<&Timestamp> {
        self.end_time.as_ref()
    }

    pub fn status(&self) -> WorkoutStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Elapsed time between start and completion. `None` until completed.
    pub fn duration(&self) -> Option<Duration> {
        let end = self.end_time?;
        let began = self.started_at.unwrap_or(self.start_time);
        Some(end.duration_since(&began))
    }

    /// Scheduled → InProgress.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(WorkoutStatus::InProgress, "start")?;
        let now = Timestamp::now();
        self.started_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// InProgress → Completed, recording the end time and closing notes.
    pub fn complete(&mut self, notes: Option<String>) -> Result<(), DomainError> {
        self.status = self
            .status
            .transition_to(WorkoutStatus::Completed, "complete")?;
        let now = Timestamp::now();
        self.end_time = Some(now);
        self.notes = optional_text(notes);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    fn scheduled() -> WorkoutSession {
        WorkoutSession::schedule(
            UserId::new(),
            None,
            "Leg day",
            None,
            Timestamp::now().add_minutes(30),
        )
        .unwrap()
    }

    #[test]
    fn schedule_starts_in_scheduled_state() {
        let session = scheduled();
        assert_eq!(session.status(), WorkoutStatus::Scheduled);
        assert!(session.end_time().is_none());
        assert!(session.duration().is_none());
    }

    #[test]
    fn schedule_rejects_blank_title() {
        let err = WorkoutSession::schedule(UserId::new(), None, " ", None, Timestamp::now())
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn full_lifecycle_sets_end_time_and_duration() {
        let mut session = scheduled();
        session.start().unwrap();
        assert_eq!(session.status(), WorkoutStatus::InProgress);
        assert!(session.end_time().is_none());

        session.complete(Some("Felt strong".to_string())).unwrap();
        assert_eq!(session.status(), WorkoutStatus::Completed);
        assert!(session.end_time().is_some());
        assert!(session.duration().unwrap() >= Duration::zero());
        assert_eq!(session.notes(), Some("Felt strong"));
    }

    #[test]
    fn complete_requires_in_progress() {
        let mut session = scheduled();
        let err = session.complete(None).unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("aggregate"), Some("WorkoutSession"));
        assert_eq!(err.detail("current_status"), Some("Scheduled"));
        assert_eq!(session.status(), WorkoutStatus::Scheduled);
    }

    #[test]
    fn start_twice_conflicts() {
        let mut session = scheduled();
        session.start().unwrap();
        let err = session.start().unwrap_err();
        assert_eq!(err.detail("current_status"), Some("InProgress"));
    }

    #[test]
    fn completed_is_terminal() {
        assert!(WorkoutStatus::Completed.is_terminal());
    }
}
