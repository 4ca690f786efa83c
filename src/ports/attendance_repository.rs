//! Attendance repository port.

use async_trait::async_trait;

use crate::domain::attendance::AttendanceRecord;
use crate::domain::foundation::{AttendanceId, DomainError, PageRequest, PaginatedResult, UserId};

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn get_by_id(&self, id: &AttendanceId) -> Result<Option<AttendanceRecord>, DomainError>;

    async fn exists(&self, id: &AttendanceId) -> Result<bool, DomainError>;

    async fn add(&self, record: &AttendanceRecord) -> Result<(), DomainError>;

    async fn update(&self, record: &AttendanceRecord) -> Result<(), DomainError>;

    /// The member's record without a check-out time, if any.
    async fn get_current_open_check_in(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AttendanceRecord>, DomainError>;

    /// A member's records ordered by check-in time, latest first.
    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PaginatedResult<AttendanceRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AttendanceRepository) {}
    }
}
