//! HTTP adapter - REST API over the dispatcher.
//!
//! Handlers translate path, query and body into a request value, send it
//! through the [`Dispatcher`] and map the outcome to a status code. No
//! business rule lives here.

pub mod billing;
pub mod error;
pub mod members;
pub mod training;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::Dispatcher;
use crate::config::ServerConfig;

pub use error::{ApiError, ErrorResponse};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Body returned by create endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct IdResponse<T> {
    pub id: T,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Builds the full application router.
///
/// `GET /health` plus the member, training and billing routers nested
/// under `/api`, wrapped in tracing, timeout and CORS layers.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    let api = members::members_router()
        .merge(training::training_router())
        .merge(billing::billing_router());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout()))
                .layer(cors_layer(&server.cors_origins_list())),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
