//! Gym Management - fitness club backend
//!
//! Members, subscription plans, trainers, workout sessions, attendance,
//! payments and invoices. Every use case is a request routed through the
//! [`application::Dispatcher`], which validates it, opens a repository scope
//! and runs its handler inside a unit of work.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
