//! Route configuration for member endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    activate_plan, cancel_subscription, create_plan, create_user, deactivate_plan,
    deactivate_user, get_plan, get_user, list_plans, list_subscriptions, list_users,
    reactivate_user, subscribe, suspend_user, update_user,
};
use crate::adapters::http::AppState;

/// Member, subscription and plan routes, relative to `/api`.
pub fn members_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/users/:id/deactivate", post(deactivate_user))
        .route("/users/:id/suspend", post(suspend_user))
        .route("/users/:id/reactivate", post(reactivate_user))
        .route(
            "/users/:id/subscriptions",
            post(subscribe).get(list_subscriptions),
        )
        .route("/subscriptions/:id/cancel", post(cancel_subscription))
        .route("/plans", post(create_plan).get(list_plans))
        .route("/plans/:id", get(get_plan))
        .route("/plans/:id/activate", post(activate_plan))
        .route("/plans/:id/deactivate", post(deactivate_plan))
}
