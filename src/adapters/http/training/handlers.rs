//! HTTP handlers for training endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::attendance::{
    CheckInCommand, CheckOutCommand, GetAttendanceByIdQuery, GetUserAttendanceQuery,
};
use crate::application::handlers::trainers::{CreateTrainerCommand, GetTrainerByIdQuery};
use crate::application::handlers::workouts::{
    CompleteWorkoutCommand, GetUserWorkoutsQuery, GetWorkoutByIdQuery, ScheduleWorkoutCommand,
    SendWorkoutReminderCommand, StartWorkoutCommand,
};
use crate::domain::foundation::{AttendanceId, TrainerId, UserId, WorkoutSessionId};

use super::dto::{
    CheckInRequest, CompleteWorkoutRequest, CreateTrainerRequest, ListWorkoutsParams,
    PageParams, ScheduleWorkoutRequest,
};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::{AppState, IdResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Trainers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/trainers
pub async fn create_trainer(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .dispatcher
        .send(CreateTrainerCommand::from(request))
        .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/trainers/:id
pub async fn get_trainer(
    State(state): State<AppState>,
    Path(trainer_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let trainer_id: TrainerId = parse_id(&trainer_id, "trainer_id")?;
    let trainer = state.dispatcher.send(GetTrainerByIdQuery { trainer_id }).await?;
    Ok(Json(trainer))
}

// ════════════════════════════════════════════════════════════════════════════════
// Workout sessions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/workouts
pub async fn schedule_workout(
    State(state): State<AppState>,
    Json(request): Json<ScheduleWorkoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .dispatcher
        .send(ScheduleWorkoutCommand::from(request))
        .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/workouts/:id
pub async fn get_workout(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: WorkoutSessionId = parse_id(&session_id, "session_id")?;
    let workout = state.dispatcher.send(GetWorkoutByIdQuery { session_id }).await?;
    Ok(Json(workout))
}

/// POST /api/workouts/:id/start
pub async fn start_workout(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: WorkoutSessionId = parse_id(&session_id, "session_id")?;
    state.dispatcher.send(StartWorkoutCommand { session_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/workouts/:id/complete
pub async fn complete_workout(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    request: Option<Json<CompleteWorkoutRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: WorkoutSessionId = parse_id(&session_id, "session_id")?;
    let notes = request.and_then(|Json(r)| r.notes);
    state
        .dispatcher
        .send(CompleteWorkoutCommand { session_id, notes })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/workouts/:id/remind
pub async fn remind_workout(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let session_id: WorkoutSessionId = parse_id(&session_id, "session_id")?;
    state
        .dispatcher
        .send(SendWorkoutReminderCommand { session_id })
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// GET /api/users/:id/workouts
pub async fn list_user_workouts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<ListWorkoutsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let query = GetUserWorkoutsQuery {
        user_id,
        status: params.status,
        page: params.page,
        page_size: params.page_size,
    };
    Ok(Json(state.dispatcher.send(query).await?))
}

// ════════════════════════════════════════════════════════════════════════════════
// Attendance
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/attendance/check-in
pub async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CheckInCommand {
        user_id: request.user_id,
        activity_type: request.activity_type,
    };
    let id = state.dispatcher.send(cmd).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// POST /api/attendance/:id/check-out
pub async fn check_out(
    State(state): State<AppState>,
    Path(attendance_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let attendance_id: AttendanceId = parse_id(&attendance_id, "attendance_id")?;
    state.dispatcher.send(CheckOutCommand { attendance_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/attendance/:id
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(attendance_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let attendance_id: AttendanceId = parse_id(&attendance_id, "attendance_id")?;
    let record = state
        .dispatcher
        .send(GetAttendanceByIdQuery { attendance_id })
        .await?;
    Ok(Json(record))
}

/// GET /api/users/:id/attendance
pub async fn list_user_attendance(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let query = GetUserAttendanceQuery {
        user_id,
        page: params.page,
        page_size: params.page_size,
    };
    Ok(Json(state.dispatcher.send(query).await?))
}
