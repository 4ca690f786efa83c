//! Trainer repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TrainerId};
use crate::domain::trainer::Trainer;

#[async_trait]
pub trait TrainerRepository: Send + Sync {
    async fn get_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError>;

    async fn exists(&self, id: &TrainerId) -> Result<bool, DomainError>;

    async fn add(&self, trainer: &Trainer) -> Result<(), DomainError>;

    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError>;

    /// Batch lookup used when building read models. Unknown ids are skipped.
    async fn get_many(&self, ids: &[TrainerId]) -> Result<Vec<Trainer>, DomainError>;
}
