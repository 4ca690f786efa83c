//! HTTP handlers for member endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::plans::{
    ActivatePlanCommand, CreatePlanCommand, DeactivatePlanCommand, GetPlanByIdQuery,
    GetPlansQuery,
};
use crate::application::handlers::users::{
    CancelSubscriptionCommand, CreateUserCommand, DeactivateUserCommand, GetUserByIdQuery,
    GetUserSubscriptionsQuery, GetUsersQuery, ReactivateUserCommand, SubscribeToPlanCommand,
    SuspendUserCommand,
};
use crate::domain::foundation::{PlanId, SubscriptionId, UserId};

use super::dto::{
    CancelSubscriptionRequest, CreatePlanRequest, CreateUserRequest, ListPlansParams,
    ListUsersParams, SubscribeRequest, UpdateUserRequest,
};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::{AppState, IdResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.dispatcher.send(CreateUserCommand::from(request)).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.dispatcher.send(GetUsersQuery::from(params)).await?;
    Ok(Json(page))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let user = state.dispatcher.send(GetUserByIdQuery { user_id }).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    state.dispatcher.send(request.into_command(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:id/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    state.dispatcher.send(DeactivateUserCommand { user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:id/suspend
pub async fn suspend_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    state.dispatcher.send(SuspendUserCommand { user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/:id/reactivate
pub async fn reactivate_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    state.dispatcher.send(ReactivateUserCommand { user_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscriptions
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/users/:id/subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let cmd = SubscribeToPlanCommand {
        user_id,
        plan_id: request.plan_id,
        start_date: request.start_date,
    };
    let id = state.dispatcher.send(cmd).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/users/:id/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let subscriptions = state
        .dispatcher
        .send(GetUserSubscriptionsQuery { user_id })
        .await?;
    Ok(Json(subscriptions))
}

/// POST /api/subscriptions/:id/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
    Json(request): Json<CancelSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription_id: SubscriptionId = parse_id(&subscription_id, "subscription_id")?;
    let cmd = CancelSubscriptionCommand {
        user_id: request.user_id,
        subscription_id,
    };
    state.dispatcher.send(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ════════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/plans
pub async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.dispatcher.send(CreatePlanCommand::from(request)).await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/plans
pub async fn list_plans(
    State(state): State<AppState>,
    Query(params): Query<ListPlansParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.dispatcher.send(GetPlansQuery::from(params)).await?;
    Ok(Json(page))
}

/// GET /api/plans/:id
pub async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let plan_id: PlanId = parse_id(&plan_id, "plan_id")?;
    let plan = state.dispatcher.send(GetPlanByIdQuery { plan_id }).await?;
    Ok(Json(plan))
}

/// POST /api/plans/:id/activate
pub async fn activate_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let plan_id: PlanId = parse_id(&plan_id, "plan_id")?;
    state.dispatcher.send(ActivatePlanCommand { plan_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/plans/:id/deactivate
pub async fn deactivate_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let plan_id: PlanId = parse_id(&plan_id, "plan_id")?;
    state.dispatcher.send(DeactivatePlanCommand { plan_id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
