//! HTTP adapter for members, plans and subscriptions.
//!
//! - `POST /users`, `GET /users`, `GET|PUT /users/:id`
//! - `POST /users/:id/{deactivate,suspend,reactivate}`
//! - `GET|POST /users/:id/subscriptions`, `POST /subscriptions/:id/cancel`
//! - `POST /plans`, `GET /plans`, `GET /plans/:id`
//! - `POST /plans/:id/{activate,deactivate}`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::members_router;
