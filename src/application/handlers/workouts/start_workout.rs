//! StartWorkoutHandler - Moves a session from Scheduled to InProgress.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::foundation::{DomainError, FieldError, WorkoutSessionId};
use crate::ports::{UnitOfWork, WorkoutRepository};

#[derive(Debug, Clone)]
pub struct StartWorkoutCommand {
    pub session_id: WorkoutSessionId,
}

impl Validate for StartWorkoutCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for StartWorkoutCommand {
    type Output = ();
    const NAME: &'static str = "StartWorkout";
}

pub struct StartWorkoutHandler {
    uow: Arc<dyn UnitOfWork>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl StartWorkoutHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, workouts: Arc<dyn WorkoutRepository>) -> Self {
        Self { uow, workouts }
    }
}

#[async_trait]
impl RequestHandler<StartWorkoutCommand> for StartWorkoutHandler {
    async fn handle(&self, cmd: StartWorkoutCommand) -> Result<(), DomainError> {
        let session_id = cmd.session_id;

        in_transaction(self.uow.as_ref(), async move {
            let mut session = self
                .workouts
                .get_by_id(&session_id)
                .await?
                .ok_or_else(|| DomainError::not_found("WorkoutSession", session_id))?;
            session.start()?;
            self.workouts.update(&session).await
        })
        .await?;

        tracing::info!(session_id = %session_id, "Workout started");
        Ok(())
    }
}
