//! Invoice repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InvoiceId, PageRequest, PaginatedResult, UserId};
use crate::domain::invoice::{Invoice, InvoiceNumber, InvoiceStatus};

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn get_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError>;

    async fn exists(&self, id: &InvoiceId) -> Result<bool, DomainError>;

    /// # Errors
    ///
    /// - `DuplicateConstraint` if the invoice number is taken
    async fn add(&self, invoice: &Invoice) -> Result<(), DomainError>;

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError>;

    async fn find_by_number(&self, number: &InvoiceNumber) -> Result<Option<Invoice>, DomainError>;

    /// A member's invoices ordered by issue date, latest first.
    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<InvoiceStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Invoice>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn InvoiceRepository) {}
    }
}
