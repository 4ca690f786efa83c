//! Request-scoped bundle of a unit of work and its repositories.

use std::sync::Arc;

use super::{
    AttendanceRepository, InvoiceRepository, PaymentRepository, PlanRepository,
    TrainerRepository, UnitOfWork, UserRepository, WorkoutRepository,
};

/// One request's view of storage.
///
/// All repositories share `uow`'s transaction. A scope must not be shared
/// between concurrent requests; dropping it with an open transaction
/// discards the transaction's writes.
#[derive(Clone)]
pub struct RepositoryScope {
    pub uow: Arc<dyn UnitOfWork>,
    pub users: Arc<dyn UserRepository>,
    pub plans: Arc<dyn PlanRepository>,
    pub trainers: Arc<dyn TrainerRepository>,
    pub workouts: Arc<dyn WorkoutRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
}

/// Hands out a fresh [`RepositoryScope`] per request.
pub trait RepositoryScopeFactory: Send + Sync {
    fn open_scope(&self) -> RepositoryScope;
}
