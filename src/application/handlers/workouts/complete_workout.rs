//! CompleteWorkoutHandler - Closes an in-progress session.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, WorkoutSessionId};
use crate::ports::{UnitOfWork, WorkoutRepository};

/// Longest closing note accepted.
const MAX_NOTES_LENGTH: usize = 2_000;

#[derive(Debug, Clone)]
pub struct CompleteWorkoutCommand {
    pub session_id: WorkoutSessionId,
    pub notes: Option<String>,
}

impl Validate for CompleteWorkoutCommand {
    fn validate(&self) -> Vec<FieldError> {
        let notes = self.notes.as_deref().unwrap_or_default();
        Rules::new()
            .max_length("notes", notes, MAX_NOTES_LENGTH)
            .finish()
    }
}

impl Request for CompleteWorkoutCommand {
    type Output = ();
    const NAME: &'static str = "CompleteWorkout";
}

pub struct CompleteWorkoutHandler {
    uow: Arc<dyn UnitOfWork>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl CompleteWorkoutHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, workouts: Arc<dyn WorkoutRepository>) -> Self {
        Self { uow, workouts }
    }
}

#[async_trait]
impl RequestHandler<CompleteWorkoutCommand> for CompleteWorkoutHandler {
    async fn handle(&self, cmd: CompleteWorkoutCommand) -> Result<(), DomainError> {
        let CompleteWorkoutCommand { session_id, notes } = cmd;

        let minutes = in_transaction(self.uow.as_ref(), async move {
            let mut session = self
                .workouts
                .get_by_id(&session_id)
                .await?
                .ok_or_else(|| DomainError::not_found("WorkoutSession", session_id))?;
            session.complete(notes)?;
            self.workouts.update(&session).await?;
            Ok(session.duration().map(|d| d.num_minutes()))
        })
        .await?;

        tracing::info!(session_id = %session_id, duration_minutes = ?minutes, "Workout completed");
        Ok(())
    }
}
