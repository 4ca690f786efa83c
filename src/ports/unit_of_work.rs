//! Unit of work port.
//!
//! Demarcates the transaction shared by every repository of one
//! [`RepositoryScope`](super::RepositoryScope).
//!
//! # Contract
//!
//! - At most one transaction is open per instance
//! - `begin` while a transaction is open fails with `InternalError`
//! - `commit` or `rollback` without an open transaction fails with
//!   `InternalError`
//! - Writes made between `begin` and `commit` are invisible to other scopes
//!   until `commit` succeeds, and are discarded by `rollback`
//! - No retries; a failed commit leaves the transaction to be rolled back

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `ConcurrencyConflict` if another scope committed a conflicting change
    /// - `DuplicateConstraint` if a uniqueness rule is violated at commit
    async fn commit(&self) -> Result<(), DomainError>;

    async fn rollback(&self) -> Result<(), DomainError>;

    fn is_active(&self) -> bool;
}
