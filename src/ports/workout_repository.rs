//! Workout session repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, PaginatedResult, UserId, WorkoutSessionId};
use crate::domain::workout::{WorkoutSession, WorkoutStatus};

#[async_trait]
pub trait WorkoutRepository: Send + Sync {
    async fn get_by_id(&self, id: &WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError>;

    async fn exists(&self, id: &WorkoutSessionId) -> Result<bool, DomainError>;

    async fn add(&self, session: &WorkoutSession) -> Result<(), DomainError>;

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError>;

    /// A member's sessions ordered by start time, latest first.
    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<WorkoutStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<WorkoutSession>, DomainError>;
}
