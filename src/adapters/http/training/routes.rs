//! Route configuration for training endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    check_in, check_out, complete_workout, create_trainer, get_attendance, get_trainer,
    get_workout, list_user_attendance, list_user_workouts, remind_workout, schedule_workout,
    start_workout,
};
use crate::adapters::http::AppState;

/// Trainer, workout and attendance routes, relative to `/api`.
pub fn training_router() -> Router<AppState> {
    Router::new()
        .route("/trainers", post(create_trainer))
        .route("/trainers/:id", get(get_trainer))
        .route("/workouts", post(schedule_workout))
        .route("/workouts/:id", get(get_workout))
        .route("/workouts/:id/start", post(start_workout))
        .route("/workouts/:id/complete", post(complete_workout))
        .route("/workouts/:id/remind", post(remind_workout))
        .route("/users/:id/workouts", get(list_user_workouts))
        .route("/attendance/check-in", post(check_in))
        .route("/attendance/:id", get(get_attendance))
        .route("/attendance/:id/check-out", post(check_out))
        .route("/users/:id/attendance", get(list_user_attendance))
}
