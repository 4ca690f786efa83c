//! Member account status changes: deactivate, suspend, reactivate.
//!
//! The three commands share one handler; the User aggregate owns the
//! transition table.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::foundation::{DomainError, FieldError, UserId};
use crate::domain::user::User;
use crate::ports::{UnitOfWork, UserRepository};

/// Soft-deletes the account.
#[derive(Debug, Clone)]
pub struct DeactivateUserCommand {
    pub user_id: UserId,
}

/// Temporarily bars the member.
#[derive(Debug, Clone)]
pub struct SuspendUserCommand {
    pub user_id: UserId,
}

/// Restores an inactive or suspended account.
#[derive(Debug, Clone)]
pub struct ReactivateUserCommand {
    pub user_id: UserId,
}

macro_rules! status_request {
    ($command:ty, $name:literal) => {
        impl Validate for $command {
            fn validate(&self) -> Vec<FieldError> {
                Vec::new()
            }
        }

        impl Request for $command {
            type Output = ();
            const NAME: &'static str = $name;
        }
    };
}

status_request!(DeactivateUserCommand, "DeactivateUser");
status_request!(SuspendUserCommand, "SuspendUser");
status_request!(ReactivateUserCommand, "ReactivateUser");

pub struct ChangeUserStatusHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
}

impl ChangeUserStatusHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, users: Arc<dyn UserRepository>) -> Self {
        Self { uow, users }
    }

    async fn apply(
        &self,
        user_id: UserId,
        transition: fn(&mut User) -> Result<(), DomainError>,
    ) -> Result<(), DomainError> {
        let status = in_transaction(self.uow.as_ref(), async move {
            let mut user = self
                .users
                .get_by_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", user_id))?;
            transition(&mut user)?;
            self.users.update(&user).await?;
            Ok(user.status())
        })
        .await?;

        tracing::info!(user_id = %user_id, status = %status.as_str(), "User status changed");
        Ok(())
    }
}

#[async_trait]
impl RequestHandler<DeactivateUserCommand> for ChangeUserStatusHandler {
    async fn handle(&self, cmd: DeactivateUserCommand) -> Result<(), DomainError> {
        self.apply(cmd.user_id, User::deactivate).await
    }
}

#[async_trait]
impl RequestHandler<SuspendUserCommand> for ChangeUserStatusHandler {
    async fn handle(&self, cmd: SuspendUserCommand) -> Result<(), DomainError> {
        self.apply(cmd.user_id, User::suspend).await
    }
}

#[async_trait]
impl RequestHandler<ReactivateUserCommand> for ChangeUserStatusHandler {
    async fn handle(&self, cmd: ReactivateUserCommand) -> Result<(), DomainError> {
        self.apply(cmd.user_id, User::reactivate).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::UserStatus;

    #[tokio::test]
    async fn suspend_then_reactivate_round_trips() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("amal@example.com").await;
        let user_id = *user.id();

        ctx.dispatcher.send(SuspendUserCommand { user_id }).await.unwrap();
        assert_eq!(
            ctx.store.committed(&user).await.unwrap().status(),
            UserStatus::Suspended
        );

        ctx.dispatcher.send(ReactivateUserCommand { user_id }).await.unwrap();
        assert_eq!(
            ctx.store.committed(&user).await.unwrap().status(),
            UserStatus::Active
        );
    }

    #[tokio::test]
    async fn deactivating_twice_is_conflicting_state() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("amal@example.com").await;
        let user_id = *user.id();
        ctx.dispatcher.send(DeactivateUserCommand { user_id }).await.unwrap();
        let before = ctx.store.committed(&user).await.unwrap();

        let err = ctx
            .dispatcher
            .send(DeactivateUserCommand { user_id })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("attempted_action"), Some("deactivate"));
        assert_eq!(ctx.store.committed(&user).await.unwrap(), before);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(SuspendUserCommand {
                user_id: UserId::new(),
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
