//! Plan availability toggles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::foundation::{DomainError, FieldError, PlanId};
use crate::domain::subscription::SubscriptionPlan;
use crate::ports::{PlanRepository, UnitOfWork};

#[derive(Debug, Clone)]
pub struct ActivatePlanCommand {
    pub plan_id: PlanId,
}

/// Existing subscriptions keep running; only new subscriptions are refused.
#[derive(Debug, Clone)]
pub struct DeactivatePlanCommand {
    pub plan_id: PlanId,
}

impl Validate for ActivatePlanCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for ActivatePlanCommand {
    type Output = ();
    const NAME: &'static str = "ActivatePlan";
}

impl Validate for DeactivatePlanCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for DeactivatePlanCommand {
    type Output = ();
    const NAME: &'static str = "DeactivatePlan";
}

pub struct ChangePlanAvailabilityHandler {
    uow: Arc<dyn UnitOfWork>,
    plans: Arc<dyn PlanRepository>,
}

impl ChangePlanAvailabilityHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, plans: Arc<dyn PlanRepository>) -> Self {
        Self { uow, plans }
    }

    async fn apply(
        &self,
        plan_id: PlanId,
        change: fn(&mut SubscriptionPlan) -> Result<(), DomainError>,
    ) -> Result<(), DomainError> {
        let is_active = in_transaction(self.uow.as_ref(), async move {
            let mut plan = self
                .plans
                .get_by_id(&plan_id)
                .await?
                .ok_or_else(|| DomainError::not_found("SubscriptionPlan", plan_id))?;
            change(&mut plan)?;
            self.plans.update(&plan).await?;
            Ok(plan.is_active())
        })
        .await?;

        tracing::info!(plan_id = %plan_id, is_active, "Plan availability changed");
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<ActivatePlanCommand> for ChangePlanAvailabilityHandler {
    async fn handle(&self, cmd: ActivatePlanCommand) -> Result<(), DomainError> {
        self.apply(cmd.plan_id, SubscriptionPlan::activate).await
    }
}

#[async_trait]
impl RequestHandler<DeactivatePlanCommand> for ChangePlanAvailabilityHandler {
    async fn handle(&self, cmd: DeactivatePlanCommand) -> Result<(), DomainError> {
        self.apply(cmd.plan_id, SubscriptionPlan::deactivate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn deactivate_then_activate() {
        let ctx = TestContext::new();
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;
        let plan_id = *plan.id();

        ctx.dispatcher.send(DeactivatePlanCommand { plan_id }).await.unwrap();
        assert!(!ctx.store.committed(&plan).await.unwrap().is_active());

        ctx.dispatcher.send(ActivatePlanCommand { plan_id }).await.unwrap();
        assert!(ctx.store.committed(&plan).await.unwrap().is_active());
    }

    #[tokio::test]
    async fn activating_active_plan_is_conflicting_state() {
        let ctx = TestContext::new();
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;

        let err = ctx
            .dispatcher
            .send(ActivatePlanCommand { plan_id: *plan.id() })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
    }
}
