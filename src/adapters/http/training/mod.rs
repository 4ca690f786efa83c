//! HTTP adapter for trainers, workout sessions and attendance.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::training_router;
