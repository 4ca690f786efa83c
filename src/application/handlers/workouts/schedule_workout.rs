//! ScheduleWorkoutHandler - Books a workout session for a member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{
    DomainError, FieldError, Timestamp, TrainerId, UserId, WorkoutSessionId,
};
use crate::domain::workout::{WorkoutSession, MAX_TITLE_LENGTH};
use crate::ports::{TrainerRepository, UnitOfWork, UserRepository, WorkoutRepository};

#[derive(Debug, Clone)]
pub struct ScheduleWorkoutCommand {
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
}

impl Validate for ScheduleWorkoutCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("title", &self.title)
            .max_length("title", &self.title, MAX_TITLE_LENGTH)
            .finish()
    }
}

impl Request for ScheduleWorkoutCommand {
    type Output = WorkoutSessionId;
    const NAME: &'static str = "ScheduleWorkout";
}

/// Checks that the member and, if named, the trainer exist before the
/// session is booked.
pub struct ScheduleWorkoutHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    trainers: Arc<dyn TrainerRepository>,
    workouts: Arc<dyn WorkoutRepository>,
}

impl ScheduleWorkoutHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        trainers: Arc<dyn TrainerRepository>,
        workouts: Arc<dyn WorkoutRepository>,
    ) -> Self {
        Self {
            uow,
            users,
            trainers,
            workouts,
        }
    }
}

#[async_trait]
impl RequestHandler<ScheduleWorkoutCommand> for ScheduleWorkoutHandler {
    async fn handle(&self, cmd: ScheduleWorkoutCommand) -> Result<WorkoutSessionId, DomainError> {
        let user_id = cmd.user_id;

        let session_id = in_transaction(self.uow.as_ref(), async move {
            if !self.users.exists(&cmd.user_id).await? {
                return Err(DomainError::not_found("User", cmd.user_id));
            }
            if let Some(trainer_id) = &cmd.trainer_id {
                if !self.trainers.exists(trainer_id).await? {
                    return Err(DomainError::not_found("Trainer", trainer_id));
                }
            }

            let session = WorkoutSession::schedule(
                cmd.user_id,
                cmd.trainer_id,
                cmd.title,
                cmd.description,
                cmd.start_time,
            )?;
            self.workouts.add(&session).await?;
            Ok(*session.id())
        })
        .await?;

        tracing::info!(user_id = %user_id, session_id = %session_id, "Workout scheduled");
        Ok(session_id)
    }
}
