//! GetUserSubscriptionsHandler - A member's subscription history.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::SubscriptionView;
use crate::domain::foundation::{DomainError, FieldError, Timestamp, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct GetUserSubscriptionsQuery {
    pub user_id: UserId,
}

impl Validate for GetUserSubscriptionsQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetUserSubscriptionsQuery {
    type Output = Vec<SubscriptionView>;
    const NAME: &'static str = "GetUserSubscriptions";
}

/// Statuses are evaluated at query time, so a lapsed subscription reads as
/// expired without any stored transition.
pub struct GetUserSubscriptionsHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserSubscriptionsHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUserSubscriptionsQuery> for GetUserSubscriptionsHandler {
    async fn handle(
        &self,
        query: GetUserSubscriptionsQuery,
    ) -> Result<Vec<SubscriptionView>, DomainError> {
        let user = self
            .users
            .get_by_id(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", query.user_id))?;

        let now = Timestamp::now();
        let mut views: Vec<_> = user
            .subscriptions()
            .iter()
            .map(|s| SubscriptionView::at(s, &now))
            .collect();
        views.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::user::SubscriptionStatus;

    #[tokio::test]
    async fn lapsed_subscription_reads_as_expired() {
        let ctx = TestContext::new();
        let mut user = ctx.seed_user("lama@example.com").await;
        let plan = ctx.seed_plan("Day pass", 2_500, 1).await;
        user.subscribe(&plan, Timestamp::now().add_days(-5)).unwrap();
        ctx.scope().users.update(&user).await.unwrap();

        let views = ctx
            .dispatcher
            .send(GetUserSubscriptionsQuery { user_id: *user.id() })
            .await
            .unwrap();

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].status, SubscriptionStatus::Expired);
        assert_eq!(views[0].plan_name, "Day pass");
    }
}
