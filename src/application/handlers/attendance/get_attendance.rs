//! GetAttendanceByIdHandler - Query handler for one attendance record.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::AttendanceView;
use crate::domain::foundation::{AttendanceId, DomainError, FieldError};
use crate::ports::AttendanceRepository;

#[derive(Debug, Clone)]
pub struct GetAttendanceByIdQuery {
    pub attendance_id: AttendanceId,
}

impl Validate for GetAttendanceByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetAttendanceByIdQuery {
    type Output = AttendanceView;
    const NAME: &'static str = "GetAttendanceById";
}

pub struct GetAttendanceByIdHandler {
    attendance: Arc<dyn AttendanceRepository>,
}

impl GetAttendanceByIdHandler {
    pub fn new(attendance: Arc<dyn AttendanceRepository>) -> Self {
        Self { attendance }
    }
}

#[async_trait]
impl RequestHandler<GetAttendanceByIdQuery> for GetAttendanceByIdHandler {
    async fn handle(&self, query: GetAttendanceByIdQuery) -> Result<AttendanceView, DomainError> {
        self.attendance
            .get_by_id(&query.attendance_id)
            .await?
            .map(|record| AttendanceView::from(&record))
            .ok_or_else(|| DomainError::not_found("AttendanceRecord", query.attendance_id))
    }
}
