//! CheckOutHandler - Closes an open attendance record.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::Validate;
use crate::domain::foundation::{AttendanceId, DomainError, FieldError, Timestamp};
use crate::ports::{AttendanceRepository, UnitOfWork};

#[derive(Debug, Clone)]
pub struct CheckOutCommand {
    pub attendance_id: AttendanceId,
}

impl Validate for CheckOutCommand {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for CheckOutCommand {
    type Output = ();
    const NAME: &'static str = "CheckOut";
}

pub struct CheckOutHandler {
    uow: Arc<dyn UnitOfWork>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl CheckOutHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, attendance: Arc<dyn AttendanceRepository>) -> Self {
        Self { uow, attendance }
    }
}

#[async_trait]
impl RequestHandler<CheckOutCommand> for CheckOutHandler {
    async fn handle(&self, cmd: CheckOutCommand) -> Result<(), DomainError> {
        let attendance_id = cmd.attendance_id;

        let minutes = in_transaction(self.uow.as_ref(), async move {
            let mut record = self
                .attendance
                .get_by_id(&attendance_id)
                .await?
                .ok_or_else(|| DomainError::not_found("AttendanceRecord", attendance_id))?;
            record.check_out(Timestamp::now())?;
            self.attendance.update(&record).await?;
            Ok(record.duration().map(|d| d.num_minutes()))
        })
        .await?;

        tracing::info!(attendance_id = %attendance_id, duration_minutes = ?minutes, "Member checked out");
        Ok(())
    }
}
