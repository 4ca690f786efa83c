//! Request DTOs for member endpoints.
//!
//! Responses reuse the application read models directly.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::handlers::plans::{CreatePlanCommand, GetPlansQuery};
use crate::application::handlers::users::{
    CreateUserCommand, GetUsersQuery, UpdateUserCommand,
};
use crate::domain::foundation::{PlanId, Timestamp, UserId};
use crate::domain::user::{Gender, UserStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub preferred_language: Option<String>,
}

impl From<CreateUserRequest> for CreateUserCommand {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            phone: r.phone,
            date_of_birth: r.date_of_birth,
            gender: r.gender,
            preferred_language: r.preferred_language,
        }
    }
}

/// Full replacement of a member's profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub preferred_language: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_command(self, user_id: UserId) -> UpdateUserCommand {
        UpdateUserCommand {
            user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            preferred_language: self.preferred_language,
        }
    }
}

/// `GET /users?page=&page_size=&status=&search=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

impl From<ListUsersParams> for GetUsersQuery {
    fn from(p: ListUsersParams) -> Self {
        Self {
            page: p.page,
            page_size: p.page_size,
            status: p.status,
            search: p.search,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeRequest {
    pub plan_id: PlanId,
    pub start_date: Option<Timestamp>,
}

/// The owning member is named in the body.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSubscriptionRequest {
    pub user_id: UserId,
}

// ════════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub currency: Option<String>,
    pub duration_days: u32,
    #[serde(default)]
    pub features: Vec<String>,
}

impl From<CreatePlanRequest> for CreatePlanCommand {
    fn from(r: CreatePlanRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
            currency: r.currency,
            duration_days: r.duration_days,
            features: r.features,
        }
    }
}

/// `GET /plans?page=&page_size=&active_only=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPlansParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    #[serde(default)]
    pub active_only: bool,
}

impl From<ListPlansParams> for GetPlansQuery {
    fn from(p: ListPlansParams) -> Self {
        Self {
            page: p.page,
            page_size: p.page_size,
            active_only: p.active_only,
        }
    }
}
