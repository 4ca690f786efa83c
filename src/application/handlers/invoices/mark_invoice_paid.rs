//! MarkInvoicePaidHandler - Settles a pending invoice.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, InvoiceId, Timestamp};
use crate::ports::{InvoiceRepository, UnitOfWork};

#[derive(Debug, Clone)]
pub struct MarkInvoicePaidCommand {
    pub invoice_id: InvoiceId,
    /// Defaults to now.
    pub paid_at: Option<Timestamp>,
}

impl Validate for MarkInvoicePaidCommand {
    fn validate(&self) -> Vec<FieldError> {
        let now = Timestamp::now();
        Rules::new()
            .check(
                "paid_at",
                self.paid_at.map_or(true, |at| at <= now),
                "cannot be in the future",
            )
            .finish()
    }
}

impl Request for MarkInvoicePaidCommand {
    type Output = ();
    const NAME: &'static str = "MarkInvoicePaid";
}

pub struct MarkInvoicePaidHandler {
    uow: Arc<dyn UnitOfWork>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl MarkInvoicePaidHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { uow, invoices }
    }
}

#[async_trait]
impl RequestHandler<MarkInvoicePaidCommand> for MarkInvoicePaidHandler {
    async fn handle(&self, cmd: MarkInvoicePaidCommand) -> Result<(), DomainError> {
        let invoice_id = cmd.invoice_id;
        let paid_at = cmd.paid_at.unwrap_or_else(Timestamp::now);

        in_transaction(self.uow.as_ref(), async move {
            let mut invoice = self
                .invoices
                .get_by_id(&invoice_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Invoice", invoice_id))?;
            invoice.mark_paid(paid_at)?;
            self.invoices.update(&invoice).await
        })
        .await?;

        tracing::info!(invoice_id = %invoice_id, "Invoice marked paid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{sar, TestContext};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::invoice::{Invoice, InvoiceNumber, InvoiceStatus};

    async fn seed_invoice(ctx: &TestContext) -> Invoice {
        let user = ctx.seed_user("rana@example.com").await;
        let invoice = Invoice::create_new(
            *user.id(),
            InvoiceNumber::generate(Timestamp::now().date()),
            sar(10_000),
            sar(1_500),
            sar(11_500),
            None,
            None,
            None,
        )
        .unwrap();
        ctx.scope().invoices.add(&invoice).await.unwrap();
        invoice
    }

    #[tokio::test]
    async fn pending_invoice_becomes_paid() {
        let ctx = TestContext::new();
        let invoice = seed_invoice(&ctx).await;

        ctx.dispatcher
            .send(MarkInvoicePaidCommand {
                invoice_id: *invoice.id(),
                paid_at: None,
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&invoice).await.unwrap();
        assert_eq!(stored.status(), InvoiceStatus::Paid);
        assert!(stored.paid_at().is_some());
    }

    #[tokio::test]
    async fn paying_twice_is_conflicting_state() {
        let ctx = TestContext::new();
        let invoice = seed_invoice(&ctx).await;
        let cmd = MarkInvoicePaidCommand {
            invoice_id: *invoice.id(),
            paid_at: None,
        };
        ctx.dispatcher.send(cmd.clone()).await.unwrap();
        let paid = ctx.store.committed(&invoice).await.unwrap();

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Paid"));
        let stored = ctx.store.committed(&invoice).await.unwrap();
        assert_eq!(stored.paid_at(), paid.paid_at());
        assert_eq!(stored, paid);
    }

    #[tokio::test]
    async fn future_payment_time_is_rejected_by_gate() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(MarkInvoicePaidCommand {
                invoice_id: InvoiceId::new(),
                paid_at: Some(Timestamp::now().add_days(1)),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
