//! GetTrainerByIdHandler - Query handler for one trainer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::TrainerView;
use crate::domain::foundation::{DomainError, FieldError, TrainerId};
use crate::ports::TrainerRepository;

#[derive(Debug, Clone)]
pub struct GetTrainerByIdQuery {
    pub trainer_id: TrainerId,
}

impl Validate for GetTrainerByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetTrainerByIdQuery {
    type Output = TrainerView;
    const NAME: &'static str = "GetTrainerById";
}

pub struct GetTrainerByIdHandler {
    trainers: Arc<dyn TrainerRepository>,
}

impl GetTrainerByIdHandler {
    pub fn new(trainers: Arc<dyn TrainerRepository>) -> Self {
        Self { trainers }
    }
}

#[async_trait]
impl RequestHandler<GetTrainerByIdQuery> for GetTrainerByIdHandler {
    async fn handle(&self, query: GetTrainerByIdQuery) -> Result<TrainerView, DomainError> {
        self.trainers
            .get_by_id(&query.trainer_id)
            .await?
            .map(|trainer| TrainerView::from(&trainer))
            .ok_or_else(|| DomainError::not_found("Trainer", query.trainer_id))
    }
}
