//! GetUserAttendanceHandler - Paged attendance history for one member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::AttendanceView;
use crate::domain::foundation::{DomainError, FieldError, PageRequest, PaginatedResult, UserId};
use crate::ports::{AttendanceRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetUserAttendanceQuery {
    pub user_id: UserId,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Validate for GetUserAttendanceQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetUserAttendanceQuery {
    type Output = PaginatedResult<AttendanceView>;
    const NAME: &'static str = "GetUserAttendance";
}

pub struct GetUserAttendanceHandler {
    users: Arc<dyn UserRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl GetUserAttendanceHandler {
    pub fn new(users: Arc<dyn UserRepository>, attendance: Arc<dyn AttendanceRepository>) -> Self {
        Self { users, attendance }
    }
}

#[async_trait]
impl RequestHandler<GetUserAttendanceQuery> for GetUserAttendanceHandler {
    async fn handle(
        &self,
        query: GetUserAttendanceQuery,
    ) -> Result<PaginatedResult<AttendanceView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        if !self.users.exists(&query.user_id).await? {
            return Err(DomainError::not_found("User", query.user_id));
        }

        let records = self
            .attendance
            .get_paginated_for_user(&query.user_id, page)
            .await?;
        Ok(records.map(|record| AttendanceView::from(&record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::attendance::GetAttendanceByIdQuery;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::attendance::{ActivityType, AttendanceRecord};
    use crate::domain::foundation::{AttendanceId, Timestamp};

    #[tokio::test]
    async fn history_is_newest_first_with_durations() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("hind@example.com").await;
        let earlier = Timestamp::now().add_days(-2);
        let mut closed = AttendanceRecord::check_in(*user.id(), ActivityType::Strength, earlier);
        closed.check_out(earlier.add_minutes(75)).unwrap();
        let open = AttendanceRecord::check_in(*user.id(), ActivityType::Gym, Timestamp::now());
        let scope = ctx.scope();
        scope.attendance.add(&closed).await.unwrap();
        scope.attendance.add(&open).await.unwrap();

        let page = ctx
            .dispatcher
            .send(GetUserAttendanceQuery {
                user_id: *user.id(),
                page: None,
                page_size: None,
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        assert!(page.items[0].is_open);
        assert_eq!(page.items[1].duration_minutes, Some(75));
    }

    #[tokio::test]
    async fn record_by_id_reports_not_found() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(GetAttendanceByIdQuery {
                attendance_id: AttendanceId::new(),
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
