//! HTTP adapter for payments and invoices.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::billing_router;
