//! GetWorkoutByIdHandler - One session with its trainer's display name.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::WorkoutView;
use crate::domain::foundation::{DomainError, FieldError, WorkoutSessionId};
use crate::ports::{TrainerRepository, WorkoutRepository};

#[derive(Debug, Clone)]
pub struct GetWorkoutByIdQuery {
    pub session_id: WorkoutSessionId,
}

impl Validate for GetWorkoutByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetWorkoutByIdQuery {
    type Output = WorkoutView;
    const NAME: &'static str = "GetWorkoutById";
}

pub struct GetWorkoutByIdHandler {
    workouts: Arc<dyn WorkoutRepository>,
    trainers: Arc<dyn TrainerRepository>,
}

impl GetWorkoutByIdHandler {
    pub fn new(workouts: Arc<dyn WorkoutRepository>, trainers: Arc<dyn TrainerRepository>) -> Self {
        Self { workouts, trainers }
    }
}

#[async_trait]
impl RequestHandler<GetWorkoutByIdQuery> for GetWorkoutByIdHandler {
    async fn handle(&self, query: GetWorkoutByIdQuery) -> Result<WorkoutView, DomainError> {
        let session = self
            .workouts
            .get_by_id(&query.session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("WorkoutSession", query.session_id))?;

        // A trainer removed since booking leaves the name blank.
        let trainer_name = match session.trainer_id() {
            Some(id) => self
                .trainers
                .get_by_id(id)
                .await?
                .map(|trainer| trainer.display_name()),
            None => None,
        };

        Ok(WorkoutView::new(&session, trainer_name))
    }
}
