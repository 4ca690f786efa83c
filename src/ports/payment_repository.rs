//! Payment repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, PaginatedResult, PaymentId, UserId};
use crate::domain::payment::{Payment, PaymentStatus};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn get_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError>;

    async fn exists(&self, id: &PaymentId) -> Result<bool, DomainError>;

    async fn add(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    /// A member's payments ordered by payment date, latest first.
    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Payment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PaymentRepository) {}
    }
}
