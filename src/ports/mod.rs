//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! One contract per aggregate: `UserRepository`, `PlanRepository`,
//! `TrainerRepository`, `WorkoutRepository`, `AttendanceRepository`,
//! `PaymentRepository`, `InvoiceRepository`. Lookups return `Option`;
//! deciding that "absent" is an error belongs to the caller.
//!
//! ## Transaction Ports
//!
//! - `UnitOfWork` - Begin/commit/rollback for one request
//! - `RepositoryScope` / `RepositoryScopeFactory` - Repositories sharing a
//!   unit of work, handed out per request
//!
//! ## Notification Ports
//!
//! - `NotificationSender` - Welcome, payment confirmation, workout reminder

mod attendance_repository;
mod invoice_repository;
mod notification_sender;
mod payment_repository;
mod plan_repository;
mod repository_scope;
mod trainer_repository;
mod unit_of_work;
mod user_repository;
mod workout_repository;

pub use attendance_repository::AttendanceRepository;
pub use invoice_repository::InvoiceRepository;
pub use notification_sender::NotificationSender;
pub use payment_repository::PaymentRepository;
pub use plan_repository::{PlanFilter, PlanRepository};
pub use repository_scope::{RepositoryScope, RepositoryScopeFactory};
pub use trainer_repository::TrainerRepository;
pub use unit_of_work::UnitOfWork;
pub use user_repository::{UserFilter, UserRepository};
pub use workout_repository::WorkoutRepository;
