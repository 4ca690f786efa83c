//! SendWorkoutReminderHandler - E-mails a member about an upcoming session.
//!
//! Nothing is persisted, so no transaction is opened. Delivery is the whole
//! use case, so a notifier failure is returned to the caller.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::domain::foundation::{DomainError, FieldError, StateMachine, WorkoutSessionId};
use crate::domain::workout::WorkoutStatus;
use crate::ports::{NotificationSender, UserRepository, WorkoutRepository};

#[derive(Debug, Clone)]
pub struct SendWorkoutReminderCommand {
    pub session_id: WorkoutSessionId,
}

impl Validate for SendWorkoutReminderCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for SendWorkoutReminderCommand {
    type Output = ();
    const NAME: &'static str = "SendWorkoutReminder";
}

pub struct SendWorkoutReminderHandler {
    users: Arc<dyn UserRepository>,
    workouts: Arc<dyn WorkoutRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl SendWorkoutReminderHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            users,
            workouts,
            notifier,
        }
    }
}

#[async_trait]
impl RequestHandler<SendWorkoutReminderCommand> for SendWorkoutReminderHandler {
    async fn handle(&self, cmd: SendWorkoutReminderCommand) -> Result<(), DomainError> {
        let session = self
            .workouts
            .get_by_id(&cmd.session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("WorkoutSession", cmd.session_id))?;

        if session.status() != WorkoutStatus::Scheduled {
            return Err(DomainError::conflicting_state(
                WorkoutStatus::AGGREGATE,
                session.status(),
                "send reminder",
            ));
        }

        let user = self
            .users
            .get_by_id(session.user_id())
            .await?
            .ok_or_else(|| DomainError::not_found("User", session.user_id()))?;

        self.notifier
            .send_workout_reminder(user.email(), user.first_name(), session.start_time())
            .await?;

        tracing::info!(session_id = %cmd.session_id, user_id = %user.id(), "Workout reminder sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notification::RecordedNotification;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::workout::WorkoutSession;

    async fn seed_session(ctx: &TestContext) -> WorkoutSession {
        let user = ctx.seed_user("yara@example.com").await;
        let session =
            WorkoutSession::schedule(*user.id(), None, "Swim", None, Timestamp::now().add_days(2))
                .unwrap();
        ctx.scope().workouts.add(&session).await.unwrap();
        session
    }

    #[tokio::test]
    async fn reminds_member_of_scheduled_session() {
        let ctx = TestContext::new();
        let session = seed_session(&ctx).await;

        ctx.dispatcher
            .send(SendWorkoutReminderCommand {
                session_id: *session.id(),
            })
            .await
            .unwrap();

        assert_eq!(
            ctx.notifier.sent(),
            vec![RecordedNotification::WorkoutReminder {
                to: "yara@example.com".to_string(),
                first_name: "Sara".to_string(),
                session_time: *session.start_time(),
            }]
        );
    }

    #[tokio::test]
    async fn started_session_gets_no_reminder() {
        let ctx = TestContext::new();
        let mut session = seed_session(&ctx).await;
        session.start().unwrap();
        ctx.scope().workouts.update(&session).await.unwrap();

        let err = ctx
            .dispatcher
            .send(SendWorkoutReminderCommand {
                session_id: *session.id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert!(ctx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_reported() {
        let ctx = TestContext::new();
        let session = seed_session(&ctx).await;
        ctx.notifier.fail_all();

        let err = ctx
            .dispatcher
            .send(SendWorkoutReminderCommand {
                session_id: *session.id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotificationFailed);
    }
}
