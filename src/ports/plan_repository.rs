//! Subscription plan repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, PaginatedResult, PlanId};
use crate::domain::subscription::SubscriptionPlan;

/// Filters for listing plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanFilter {
    pub active_only: bool,
}

#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn get_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError>;

    async fn exists(&self, id: &PlanId) -> Result<bool, DomainError>;

    async fn add(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `NotFound` if the plan does not exist
    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError>;

    /// Page of plans ordered by price, cheapest first.
    async fn get_paginated(
        &self,
        filter: PlanFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<SubscriptionPlan>, DomainError>;
}
