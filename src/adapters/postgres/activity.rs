//! PostgreSQL implementations of WorkoutRepository and AttendanceRepository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session::{corrupt_row, driver_error, violated_unique_constraint, PgSession};
use crate::domain::attendance::{ActivityType, AttendanceRecord};
use crate::domain::foundation::{
    AttendanceId, DomainError, PageRequest, PaginatedResult, Timestamp, TrainerId, UserId,
    WorkoutSessionId,
};
use crate::domain::workout::{WorkoutSession, WorkoutStatus};
use crate::ports::{AttendanceRepository, WorkoutRepository};

// ════════════════════════════════════════════════════════════════════════════
// Workouts
// ════════════════════════════════════════════════════════════════════════════

const WORKOUT_COLUMNS: &str = "id, user_id, trainer_id, title, description, start_time, \
     started_at, end_time, status, notes, created_at, updated_at";

pub struct PostgresWorkoutRepository {
    session: Arc<PgSession>,
}

impl PostgresWorkoutRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WorkoutRow {
    id: Uuid,
    user_id: Uuid,
    trainer_id: Option<Uuid>,
    title: String,
    description: Option<String>,
    start_time: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorkoutRow> for WorkoutSession {
    type Error = DomainError;

    fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
        let status = WorkoutStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row("WorkoutSession", "status", &row.status))?;

        Ok(WorkoutSession::reconstitute(
            WorkoutSessionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.trainer_id.map(TrainerId::from_uuid),
            row.title,
            row.description,
            Timestamp::from_datetime(row.start_time),
            row.started_at.map(Timestamp::from_datetime),
            row.end_time.map(Timestamp::from_datetime),
            status,
            row.notes,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[async_trait]
impl WorkoutRepository for PostgresWorkoutRepository {
    async fn get_by_id(&self, id: &WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError> {
        let sql = format!(
            "SELECT {} FROM workout_sessions WHERE id = $1{}",
            WORKOUT_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, WorkoutRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load workout session", e))?
            .map(WorkoutSession::try_from)
            .transpose()
    }

    async fn exists(&self, id: &WorkoutSessionId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(
                sqlx::query_as("SELECT COUNT(*) FROM workout_sessions WHERE id = $1")
                    .bind(id.as_uuid()),
            )
            .await
            .map_err(|e| driver_error("check workout session", e))?;
        Ok(count > 0)
    }

    async fn add(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO workout_sessions (
                        id, user_id, trainer_id, title, description, start_time,
                        started_at, end_time, status, notes, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(session.id().as_uuid())
                .bind(session.user_id().as_uuid())
                .bind(session.trainer_id().map(|id| *id.as_uuid()))
                .bind(session.title())
                .bind(session.description())
                .bind(session.start_time().as_datetime())
                .bind(session.started_at().map(|t| *t.as_datetime()))
                .bind(session.end_time().map(|t| *t.as_datetime()))
                .bind(session.status().as_str())
                .bind(session.notes())
                .bind(session.created_at().as_datetime())
                .bind(session.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("insert workout session", e))?;
        Ok(())
    }

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE workout_sessions SET
                        trainer_id = $2,
                        title = $3,
                        description = $4,
                        start_time = $5,
                        started_at = $6,
                        end_time = $7,
                        status = $8,
                        notes = $9,
                        updated_at = $10
                    WHERE id = $1
                    "#,
                )
                .bind(session.id().as_uuid())
                .bind(session.trainer_id().map(|id| *id.as_uuid()))
                .bind(session.title())
                .bind(session.description())
                .bind(session.start_time().as_datetime())
                .bind(session.started_at().map(|t| *t.as_datetime()))
                .bind(session.end_time().map(|t| *t.as_datetime()))
                .bind(session.status().as_str())
                .bind(session.notes())
                .bind(session.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update workout session", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("WorkoutSession", session.id()));
        }
        Ok(())
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<WorkoutStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<WorkoutSession>, DomainError> {
        let status = status.map(|s| s.as_str());
        let total = self
            .session
            .count(
                sqlx::query_as(
                    "SELECT COUNT(*) FROM workout_sessions \
                     WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
                )
                .bind(user_id.as_uuid())
                .bind(status),
            )
            .await
            .map_err(|e| driver_error("count workout sessions", e))?;

        let sql = format!(
            "SELECT {} FROM workout_sessions \
             WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY start_time DESC, id LIMIT $3 OFFSET $4",
            WORKOUT_COLUMNS
        );
        let sessions = self
            .session
            .fetch_all(
                sqlx::query_as::<_, WorkoutRow>(&sql)
                    .bind(user_id.as_uuid())
                    .bind(status)
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list workout sessions", e))?
            .into_iter()
            .map(WorkoutSession::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(sessions, total, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Attendance
// ════════════════════════════════════════════════════════════════════════════

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, activity_type, check_in_time, check_out_time, created_at, updated_at";

pub struct PostgresAttendanceRepository {
    session: Arc<PgSession>,
}

impl PostgresAttendanceRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AttendanceRow {
    id: Uuid,
    user_id: Uuid,
    activity_type: String,
    check_in_time: DateTime<Utc>,
    check_out_time: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = DomainError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let activity_type: ActivityType = row
            .activity_type
            .parse()
            .map_err(|e| corrupt_row("AttendanceRecord", "activity_type", e))?;

        Ok(AttendanceRecord::reconstitute(
            AttendanceId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            activity_type,
            Timestamp::from_datetime(row.check_in_time),
            row.check_out_time.map(Timestamp::from_datetime),
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[async_trait]
impl AttendanceRepository for PostgresAttendanceRepository {
    async fn get_by_id(&self, id: &AttendanceId) -> Result<Option<AttendanceRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM attendance_records WHERE id = $1{}",
            ATTENDANCE_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, AttendanceRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load attendance record", e))?
            .map(AttendanceRecord::try_from)
            .transpose()
    }

    async fn exists(&self, id: &AttendanceId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(
                sqlx::query_as("SELECT COUNT(*) FROM attendance_records WHERE id = $1")
                    .bind(id.as_uuid()),
            )
            .await
            .map_err(|e| driver_error("check attendance record", e))?;
        Ok(count > 0)
    }

    /// # Errors
    ///
    /// - `ConcurrencyConflict` if the member already has an open record
    async fn add(&self, record: &AttendanceRecord) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO attendance_records (
                        id, user_id, activity_type, check_in_time, check_out_time,
                        created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(record.id().as_uuid())
                .bind(record.user_id().as_uuid())
                .bind(record.activity_type().as_str())
                .bind(record.check_in_time().as_datetime())
                .bind(record.check_out_time().map(|t| *t.as_datetime()))
                .bind(record.created_at().as_datetime())
                .bind(record.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| match violated_unique_constraint(&e).as_deref() {
                Some("attendance_one_open_per_user") => {
                    DomainError::concurrency_conflict("AttendanceRecord", record.user_id())
                }
                _ => driver_error("insert attendance record", e),
            })?;
        Ok(())
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE attendance_records SET
                        activity_type = $2,
                        check_out_time = $3,
                        updated_at = $4
                    WHERE id = $1
                    "#,
                )
                .bind(record.id().as_uuid())
                .bind(record.activity_type().as_str())
                .bind(record.check_out_time().map(|t| *t.as_datetime()))
                .bind(record.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update attendance record", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("AttendanceRecord", record.id()));
        }
        Ok(())
    }

    async fn get_current_open_check_in(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AttendanceRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM attendance_records WHERE user_id = $1 AND check_out_time IS NULL{}",
            ATTENDANCE_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, AttendanceRow>(&sql).bind(user_id.as_uuid()))
            .await
            .map_err(|e| driver_error("load open check-in", e))?
            .map(AttendanceRecord::try_from)
            .transpose()
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PaginatedResult<AttendanceRecord>, DomainError> {
        let total = self
            .session
            .count(
                sqlx::query_as("SELECT COUNT(*) FROM attendance_records WHERE user_id = $1")
                    .bind(user_id.as_uuid()),
            )
            .await
            .map_err(|e| driver_error("count attendance records", e))?;

        let sql = format!(
            "SELECT {} FROM attendance_records WHERE user_id = $1 \
             ORDER BY check_in_time DESC, id LIMIT $2 OFFSET $3",
            ATTENDANCE_COLUMNS
        );
        let records = self
            .session
            .fetch_all(
                sqlx::query_as::<_, AttendanceRow>(&sql)
                    .bind(user_id.as_uuid())
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list attendance records", e))?
            .into_iter()
            .map(AttendanceRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(records, total, page))
    }
}
