//! SubscribeToPlanHandler - Starts a member's subscription to a plan.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, PlanId, SubscriptionId, Timestamp, UserId};
use crate::ports::{PlanRepository, UnitOfWork, UserRepository};

#[derive(Debug, Clone)]
pub struct SubscribeToPlanCommand {
    pub user_id: UserId,
    pub plan_id: PlanId,
    /// Defaults to now. May not fall on a day before today.
    pub start_date: Option<Timestamp>,
}

impl Validate for SubscribeToPlanCommand {
    fn validate(&self) -> Vec<FieldError> {
        let today = Timestamp::now().date();
        Rules::new()
            .check(
                "start_date",
                self.start_date.map_or(true, |s| s.date() >= today),
                "cannot be in the past",
            )
            .finish()
    }
}

impl Request for SubscribeToPlanCommand {
    type Output = SubscriptionId;
    const NAME: &'static str = "SubscribeToPlan";
}

/// Loads the member and the plan, then lets the User aggregate create the
/// subscription. The subscription is persisted with the member in one
/// transaction, so two concurrent subscribe requests for the same member
/// race on the member row and the loser fails.
pub struct SubscribeToPlanHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    plans: Arc<dyn PlanRepository>,
}

impl SubscribeToPlanHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        plans: Arc<dyn PlanRepository>,
    ) -> Self {
        Self { uow, users, plans }
    }
}

#[async_trait]
impl RequestHandler<SubscribeToPlanCommand> for SubscribeToPlanHandler {
    async fn handle(&self, cmd: SubscribeToPlanCommand) -> Result<SubscriptionId, DomainError> {
        let SubscribeToPlanCommand {
            user_id,
            plan_id,
            start_date,
        } = cmd;
        let start_date = start_date.unwrap_or_else(Timestamp::now);

        let subscription_id = in_transaction(self.uow.as_ref(), async move {
            let mut user = self
                .users
                .get_by_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", user_id))?;
            let plan = self
                .plans
                .get_by_id(&plan_id)
                .await?
                .ok_or_else(|| DomainError::not_found("SubscriptionPlan", plan_id))?;

            let subscription_id = user.subscribe(&plan, start_date)?;
            self.users.update(&user).await?;
            Ok(subscription_id)
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            plan_id = %plan_id,
            subscription_id = %subscription_id,
            "User subscribed to plan"
        );
        Ok(subscription_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::SubscriptionStatus;

    #[tokio::test]
    async fn subscription_window_follows_plan_duration() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;

        let id = ctx
            .dispatcher
            .send(SubscribeToPlanCommand {
                user_id: *user.id(),
                plan_id: *plan.id(),
                start_date: None,
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&user).await.unwrap();
        let subscription = stored.subscription(&id).unwrap();
        assert_eq!(
            subscription.end_date().duration_since(subscription.start_date()),
            chrono::Duration::days(30)
        );
        assert_eq!(subscription.price(), plan.price());
        assert!(stored.has_active_subscription());
    }

    #[tokio::test]
    async fn second_overlapping_subscription_is_rejected() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;
        let cmd = SubscribeToPlanCommand {
            user_id: *user.id(),
            plan_id: *plan.id(),
            start_date: None,
        };
        ctx.dispatcher.send(cmd.clone()).await.unwrap();

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("HasActiveSubscription"));
        let stored = ctx.store.committed(&user).await.unwrap();
        assert_eq!(stored.subscriptions().len(), 1);
    }

    #[tokio::test]
    async fn missing_plan_is_not_found() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;

        let err = ctx
            .dispatcher
            .send(SubscribeToPlanCommand {
                user_id: *user.id(),
                plan_id: PlanId::new(),
                start_date: None,
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.detail("entity"), Some("SubscriptionPlan"));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let ctx = TestContext::new();
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;

        let err = ctx
            .dispatcher
            .send(SubscribeToPlanCommand {
                user_id: UserId::new(),
                plan_id: *plan.id(),
                start_date: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.detail("entity"), Some("User"));
    }

    #[tokio::test]
    async fn inactive_plan_is_conflicting_state() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let mut plan = ctx.seed_plan("Legacy", 9_900, 30).await;
        plan.deactivate().unwrap();
        ctx.scope().plans.update(&plan).await.unwrap();

        let err = ctx
            .dispatcher
            .send(SubscribeToPlanCommand {
                user_id: *user.id(),
                plan_id: *plan.id(),
                start_date: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
    }

    #[tokio::test]
    async fn past_start_date_fails_the_gate() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(SubscribeToPlanCommand {
                user_id: UserId::new(),
                plan_id: PlanId::new(),
                start_date: Some(Timestamp::now().add_days(-3)),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn subscription_starting_after_current_one_ends_is_allowed() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;
        ctx.dispatcher
            .send(SubscribeToPlanCommand {
                user_id: *user.id(),
                plan_id: *plan.id(),
                start_date: None,
            })
            .await
            .unwrap();

        ctx.dispatcher
            .send(SubscribeToPlanCommand {
                user_id: *user.id(),
                plan_id: *plan.id(),
                start_date: Some(Timestamp::now().add_days(31)),
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&user).await.unwrap();
        assert_eq!(stored.subscriptions().len(), 2);
        assert!(stored
            .subscriptions()
            .iter()
            .all(|s| s.stored_status() == SubscriptionStatus::Active));
    }
}
