//! CheckInHandler - Opens an attendance record for a member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::attendance::{ActivityType, AttendanceRecord, AttendanceState};
use crate::domain::foundation::{
    AttendanceId, DomainError, FieldError, StateMachine, Timestamp, UserId,
};
use crate::domain::user::UserStatus;
use crate::ports::{AttendanceRepository, UnitOfWork, UserRepository};

#[derive(Debug, Clone)]
pub struct CheckInCommand {
    pub user_id: UserId,
    pub activity_type: ActivityType,
}

impl Validate for CheckInCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for CheckInCommand {
    type Output = AttendanceId;
    const NAME: &'static str = "CheckIn";
}

/// A member holds at most one open record. A second check-in while one is
/// open is a state conflict whatever the activity type.
pub struct CheckInHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl CheckInHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            uow,
            users,
            attendance,
        }
    }
}

#[async_trait]
impl RequestHandler<CheckInCommand> for CheckInHandler {
    async fn handle(&self, cmd: CheckInCommand) -> Result<AttendanceId, DomainError> {
        let CheckInCommand {
            user_id,
            activity_type,
        } = cmd;

        let attendance_id = in_transaction(self.uow.as_ref(), async move {
            let user = self
                .users
                .get_by_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", user_id))?;
            if user.status() != UserStatus::Active {
                return Err(DomainError::conflicting_state(
                    UserStatus::AGGREGATE,
                    user.status(),
                    "check in",
                ));
            }

            if let Some(open) = self.attendance.get_current_open_check_in(&user_id).await? {
                return Err(DomainError::conflicting_state(
                    AttendanceState::AGGREGATE,
                    AttendanceState::Open,
                    "check in",
                )
                .with_detail("attendance_id", open.id().to_string()));
            }

            let record = AttendanceRecord::check_in(user_id, activity_type, Timestamp::now());
            self.attendance.add(&record).await?;
            Ok(*record.id())
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            attendance_id = %attendance_id,
            activity = %activity_type,
            "Member checked in"
        );
        Ok(attendance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{member, TestContext};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn opens_record_for_active_member() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("hind@example.com").await;

        let id = ctx
            .dispatcher
            .send(CheckInCommand {
                user_id: *user.id(),
                activity_type: ActivityType::Yoga,
            })
            .await
            .unwrap();

        let record = ctx.scope().attendance.get_by_id(&id).await.unwrap().unwrap();
        assert!(record.is_open());
        assert_eq!(record.activity_type(), ActivityType::Yoga);
    }

    #[tokio::test]
    async fn second_check_in_conflicts_for_any_activity() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("hind@example.com").await;
        let first = ctx
            .dispatcher
            .send(CheckInCommand {
                user_id: *user.id(),
                activity_type: ActivityType::Gym,
            })
            .await
            .unwrap();

        for activity in [ActivityType::Gym, ActivityType::Swimming, ActivityType::Other] {
            let err = ctx
                .dispatcher
                .send(CheckInCommand {
                    user_id: *user.id(),
                    activity_type: activity,
                })
                .await
                .unwrap_err();

            assert_eq!(err.code, ErrorCode::ConflictingState);
            assert_eq!(err.detail("aggregate"), Some("AttendanceRecord"));
            assert_eq!(err.detail("attendance_id"), Some(first.to_string().as_str()));
        }
        assert_eq!(ctx.store.count::<AttendanceRecord>().await, 1);
    }

    #[tokio::test]
    async fn suspended_member_cannot_check_in() {
        let ctx = TestContext::new();
        let mut user = member("hind@example.com");
        user.suspend().unwrap();
        ctx.scope().users.add(&user).await.unwrap();

        let err = ctx
            .dispatcher
            .send(CheckInCommand {
                user_id: *user.id(),
                activity_type: ActivityType::Gym,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("aggregate"), Some("User"));
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(CheckInCommand {
                user_id: UserId::new(),
                activity_type: ActivityType::Gym,
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
