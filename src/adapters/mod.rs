//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-process storage with transactional sessions
//! - `postgres` - PostgreSQL storage via sqlx
//! - `notification` - E-mail delivery (Resend) and log-only senders
//! - `http` - REST API over the dispatcher

pub mod http;
pub mod memory;
pub mod notification;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
