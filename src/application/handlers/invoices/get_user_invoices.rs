//! GetUserInvoicesHandler - Paged invoices for one member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::InvoiceView;
use crate::domain::foundation::{DomainError, FieldError, PageRequest, PaginatedResult, UserId};
use crate::domain::invoice::InvoiceStatus;
use crate::ports::{InvoiceRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetUserInvoicesQuery {
    pub user_id: UserId,
    pub status: Option<InvoiceStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Validate for GetUserInvoicesQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetUserInvoicesQuery {
    type Output = PaginatedResult<InvoiceView>;
    const NAME: &'static str = "GetUserInvoices";
}

pub struct GetUserInvoicesHandler {
    users: Arc<dyn UserRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl GetUserInvoicesHandler {
    pub fn new(users: Arc<dyn UserRepository>, invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { users, invoices }
    }
}

#[async_trait]
impl RequestHandler<GetUserInvoicesQuery> for GetUserInvoicesHandler {
    async fn handle(
        &self,
        query: GetUserInvoicesQuery,
    ) -> Result<PaginatedResult<InvoiceView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        if !self.users.exists(&query.user_id).await? {
            return Err(DomainError::not_found("User", query.user_id));
        }

        let invoices = self
            .invoices
            .get_paginated_for_user(&query.user_id, query.status, page)
            .await?;
        Ok(invoices.map(|invoice| InvoiceView::from(&invoice)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::invoices::{
        CreateInvoiceCommand, GetInvoiceByIdQuery, MarkInvoicePaidCommand,
    };
    use crate::application::handlers::test_support::TestContext;

    fn invoice_for(user_id: UserId, base: &str) -> CreateInvoiceCommand {
        CreateInvoiceCommand {
            user_id,
            base_amount: base.to_string(),
            tax_amount: None,
            currency: None,
            payment_id: None,
            due_date: None,
            notes: Some("Monthly membership".to_string()),
        }
    }

    #[tokio::test]
    async fn lists_member_invoices_by_status() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let other = ctx.seed_user("someone@example.com").await;
        let first = ctx.dispatcher.send(invoice_for(*user.id(), "100")).await.unwrap();
        ctx.dispatcher.send(invoice_for(*user.id(), "50")).await.unwrap();
        ctx.dispatcher.send(invoice_for(*other.id(), "75")).await.unwrap();
        ctx.dispatcher
            .send(MarkInvoicePaidCommand {
                invoice_id: first.invoice_id,
                paid_at: None,
            })
            .await
            .unwrap();

        let all = ctx
            .dispatcher
            .send(GetUserInvoicesQuery {
                user_id: *user.id(),
                status: None,
                page: None,
                page_size: None,
            })
            .await
            .unwrap();
        let paid = ctx
            .dispatcher
            .send(GetUserInvoicesQuery {
                user_id: *user.id(),
                status: Some(InvoiceStatus::Paid),
                page: None,
                page_size: None,
            })
            .await
            .unwrap();

        assert_eq!(all.total_count, 2);
        assert_eq!(paid.total_count, 1);
        assert_eq!(paid.items[0].invoice_number, first.invoice_number.to_string());
    }

    #[tokio::test]
    async fn invoice_view_carries_amounts() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("maha@example.com").await;
        let created = ctx.dispatcher.send(invoice_for(*user.id(), "100")).await.unwrap();

        let view = ctx
            .dispatcher
            .send(GetInvoiceByIdQuery {
                invoice_id: created.invoice_id,
            })
            .await
            .unwrap();

        assert_eq!(view.base_amount.amount, "100.00");
        assert_eq!(view.tax_amount.amount, "15.00");
        assert_eq!(view.total_amount.amount, "115.00");
        assert_eq!(view.notes.as_deref(), Some("Monthly membership"));
    }
}
