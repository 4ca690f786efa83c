//! CreateTrainerHandler - Adds a trainer to the roster.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, TrainerId};
use crate::domain::trainer::Trainer;
use crate::domain::user::MAX_NAME_LENGTH;
use crate::ports::{TrainerRepository, UnitOfWork};

#[derive(Debug, Clone)]
pub struct CreateTrainerCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialization: Option<String>,
}

impl Validate for CreateTrainerCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("first_name", &self.first_name)
            .max_length("first_name", &self.first_name, MAX_NAME_LENGTH)
            .required("last_name", &self.last_name)
            .max_length("last_name", &self.last_name, MAX_NAME_LENGTH)
            .email("email", &self.email)
            .finish()
    }
}

impl Request for CreateTrainerCommand {
    type Output = TrainerId;
    const NAME: &'static str = "CreateTrainer";
}

pub struct CreateTrainerHandler {
    uow: Arc<dyn UnitOfWork>,
    trainers: Arc<dyn TrainerRepository>,
}

impl CreateTrainerHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, trainers: Arc<dyn TrainerRepository>) -> Self {
        Self { uow, trainers }
    }
}

#[async_trait]
impl RequestHandler<CreateTrainerCommand> for CreateTrainerHandler {
    async fn handle(&self, cmd: CreateTrainerCommand) -> Result<TrainerId, DomainError> {
        let trainer = Trainer::create_new(
            cmd.first_name,
            cmd.last_name,
            &cmd.email,
            cmd.specialization,
        )?;

        in_transaction(self.uow.as_ref(), async {
            self.trainers.add(&trainer).await
        })
        .await?;

        tracing::info!(trainer_id = %trainer.id(), "Trainer created");
        Ok(*trainer.id())
    }
}
