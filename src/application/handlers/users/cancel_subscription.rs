//! CancelSubscriptionHandler - Ends a member's subscription.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::foundation::{DomainError, FieldError, SubscriptionId, UserId};
use crate::ports::{UnitOfWork, UserRepository};

/// Cancellation is terminal; a cancelled subscription is never reactivated.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

impl Validate for CancelSubscriptionCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for CancelSubscriptionCommand {
    type Output = ();
    const NAME: &'static str = "CancelSubscription";
}

pub struct CancelSubscriptionHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, users: Arc<dyn UserRepository>) -> Self {
        Self { uow, users }
    }
}

#[async_trait]
impl RequestHandler<CancelSubscriptionCommand> for CancelSubscriptionHandler {
    async fn handle(&self, cmd: CancelSubscriptionCommand) -> Result<(), DomainError> {
        let CancelSubscriptionCommand {
            user_id,
            subscription_id,
        } = cmd;

        in_transaction(self.uow.as_ref(), async move {
            let mut user = self
                .users
                .get_by_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", user_id))?;
            user.cancel_subscription(&subscription_id)?;
            self.users.update(&user).await
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            subscription_id = %subscription_id,
            "Subscription cancelled"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::user::SubscriptionStatus;

    async fn subscribed(ctx: &TestContext) -> (crate::domain::user::User, SubscriptionId) {
        let mut user = ctx.seed_user("reem@example.com").await;
        let plan = ctx.seed_plan("Quarterly", 79_900, 90).await;
        let id = user.subscribe(&plan, Timestamp::now()).unwrap();
        ctx.scope().users.update(&user).await.unwrap();
        (user, id)
    }

    #[tokio::test]
    async fn cancels_active_subscription() {
        let ctx = TestContext::new();
        let (user, subscription_id) = subscribed(&ctx).await;

        ctx.dispatcher
            .send(CancelSubscriptionCommand {
                user_id: *user.id(),
                subscription_id,
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&user).await.unwrap();
        let subscription = stored.subscription(&subscription_id).unwrap();
        assert_eq!(subscription.stored_status(), SubscriptionStatus::Cancelled);
        assert!(subscription.cancelled_at().is_some());
        assert!(!stored.has_active_subscription());
    }

    #[tokio::test]
    async fn cancelling_twice_is_conflicting_state() {
        let ctx = TestContext::new();
        let (user, subscription_id) = subscribed(&ctx).await;
        let cmd = CancelSubscriptionCommand {
            user_id: *user.id(),
            subscription_id,
        };
        ctx.dispatcher.send(cmd.clone()).await.unwrap();
        let cancelled = ctx.store.committed(&user).await.unwrap();
        let cancelled_at = cancelled
            .subscription(&subscription_id)
            .and_then(|s| s.cancelled_at())
            .cloned();
        assert!(cancelled_at.is_some());

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("aggregate"), Some("UserSubscription"));
        let stored = ctx.store.committed(&user).await.unwrap();
        assert_eq!(
            stored
                .subscription(&subscription_id)
                .and_then(|s| s.cancelled_at())
                .cloned(),
            cancelled_at
        );
        assert_eq!(stored, cancelled);
    }

    #[tokio::test]
    async fn subscription_of_another_member_is_not_found() {
        let ctx = TestContext::new();
        let (_, subscription_id) = subscribed(&ctx).await;
        let other = ctx.seed_user("other@example.com").await;

        let err = ctx
            .dispatcher
            .send(CancelSubscriptionCommand {
                user_id: *other.id(),
                subscription_id,
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.detail("entity"), Some("UserSubscription"));
    }
}
