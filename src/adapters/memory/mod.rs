//! In-memory storage adapter.
//!
//! Used when no database URL is configured and by the test suites. Behaves
//! like the PostgreSQL adapter at the port level: request-scoped
//! transactions, invisible staged writes, uniqueness checks, and a failure
//! for the losing side of a concurrent write.
//!
//! # Fault injection
//!
//! Tests can make the next commit, rollback or write of a given entity fail
//! to exercise rollback paths:
//!
//! ```ignore
//! store.fail_next_commit(DomainError::database("connection reset"));
//! ```

mod repositories;
mod store;

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::{RepositoryScope, RepositoryScopeFactory};

pub use repositories::{
    MemoryAttendanceRepository, MemoryInvoiceRepository, MemoryPaymentRepository,
    MemoryPlanRepository, MemoryTrainerRepository, MemoryUnitOfWork, MemoryUserRepository,
    MemoryWorkoutRepository,
};
pub use store::{MemorySession, Stored};

use store::StoreInner;

/// Shared in-memory store. Cloning shares the same data.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner::new()),
        }
    }

    /// The next commit on any session fails with `error`.
    pub fn fail_next_commit(&self, error: DomainError) {
        self.inner.inject_commit_failure(error);
    }

    /// The next rollback on any session fails with `error`.
    pub fn fail_next_rollback(&self, error: DomainError) {
        self.inner.inject_rollback_failure(error);
    }

    /// The next `add`/`update` of entity `T` fails with `error`.
    pub fn fail_next_write<T: Stored>(&self, error: DomainError) {
        self.inner.inject_write_failure(T::ENTITY, error);
    }

    /// Committed state of one aggregate, bypassing any transaction.
    pub async fn committed<T: Stored>(&self, aggregate: &T) -> Option<T> {
        self.inner.committed(aggregate.row_key()).await
    }

    /// Number of committed aggregates of type `T`.
    pub async fn count<T: Stored>(&self) -> usize {
        self.inner.committed_count::<T>().await
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryScopeFactory for MemoryStore {
    fn open_scope(&self) -> RepositoryScope {
        let session = Arc::new(MemorySession::new(self.inner.clone()));
        RepositoryScope {
            uow: Arc::new(MemoryUnitOfWork::new(session.clone())),
            users: Arc::new(MemoryUserRepository::new(session.clone())),
            plans: Arc::new(MemoryPlanRepository::new(session.clone())),
            trainers: Arc::new(MemoryTrainerRepository::new(session.clone())),
            workouts: Arc::new(MemoryWorkoutRepository::new(session.clone())),
            attendance: Arc::new(MemoryAttendanceRepository::new(session.clone())),
            payments: Arc::new(MemoryPaymentRepository::new(session.clone())),
            invoices: Arc::new(MemoryInvoiceRepository::new(session)),
        }
    }
}
