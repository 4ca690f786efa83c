//! Trainer handlers.

mod create_trainer;
mod get_trainer;

pub use create_trainer::{CreateTrainerCommand, CreateTrainerHandler};
pub use get_trainer::{GetTrainerByIdHandler, GetTrainerByIdQuery};
