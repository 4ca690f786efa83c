//! Request DTOs for training endpoints.

use serde::Deserialize;

use crate::application::handlers::trainers::CreateTrainerCommand;
use crate::application::handlers::workouts::ScheduleWorkoutCommand;
use crate::domain::attendance::ActivityType;
use crate::domain::foundation::{Timestamp, TrainerId, UserId};
use crate::domain::workout::WorkoutStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrainerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub specialization: Option<String>,
}

impl From<CreateTrainerRequest> for CreateTrainerCommand {
    fn from(r: CreateTrainerRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            specialization: r.specialization,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleWorkoutRequest {
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
}

impl From<ScheduleWorkoutRequest> for ScheduleWorkoutCommand {
    fn from(r: ScheduleWorkoutRequest) -> Self {
        Self {
            user_id: r.user_id,
            trainer_id: r.trainer_id,
            title: r.title,
            description: r.description,
            start_time: r.start_time,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteWorkoutRequest {
    pub notes: Option<String>,
}

/// `GET /users/:id/workouts?status=&page=&page_size=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListWorkoutsParams {
    pub status: Option<WorkoutStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRequest {
    pub user_id: UserId,
    pub activity_type: ActivityType,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
