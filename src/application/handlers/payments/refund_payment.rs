//! RefundPaymentHandler - Reverses a processed payment.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, PaymentId};
use crate::ports::{PaymentRepository, UnitOfWork};

const MAX_REASON_LENGTH: usize = 500;

#[derive(Debug, Clone)]
pub struct RefundPaymentCommand {
    pub payment_id: PaymentId,
    pub reason: String,
}

impl Validate for RefundPaymentCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("reason", &self.reason)
            .max_length("reason", &self.reason, MAX_REASON_LENGTH)
            .finish()
    }
}

impl Request for RefundPaymentCommand {
    type Output = ();
    const NAME: &'static str = "RefundPayment";
}

pub struct RefundPaymentHandler {
    uow: Arc<dyn UnitOfWork>,
    payments: Arc<dyn PaymentRepository>,
}

impl RefundPaymentHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { uow, payments }
    }
}

#[async_trait]
impl RequestHandler<RefundPaymentCommand> for RefundPaymentHandler {
    async fn handle(&self, cmd: RefundPaymentCommand) -> Result<(), DomainError> {
        let RefundPaymentCommand { payment_id, reason } = cmd;

        in_transaction(self.uow.as_ref(), async move {
            let mut payment = self
                .payments
                .get_by_id(&payment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;
            payment.refund(reason)?;
            self.payments.update(&payment).await
        })
        .await?;

        tracing::info!(payment_id = %payment_id, "Payment refunded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{sar, TestContext};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};

    #[tokio::test]
    async fn refunding_pending_payment_is_conflicting_state() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("abeer@example.com").await;
        let payment =
            Payment::create_new(*user.id(), sar(5_000), PaymentMethod::Online, None, None).unwrap();
        ctx.scope().payments.add(&payment).await.unwrap();

        let err = ctx
            .dispatcher
            .send(RefundPaymentCommand {
                payment_id: *payment.id(),
                reason: "duplicate".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Pending"));
        assert_eq!(
            ctx.store.committed(&payment).await.unwrap().status(),
            PaymentStatus::Pending
        );
    }

    #[tokio::test]
    async fn refund_stores_reason() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("abeer@example.com").await;
        let mut payment =
            Payment::create_new(*user.id(), sar(5_000), PaymentMethod::Online, None, None).unwrap();
        payment.process("TXN9").unwrap();
        ctx.scope().payments.add(&payment).await.unwrap();

        ctx.dispatcher
            .send(RefundPaymentCommand {
                payment_id: *payment.id(),
                reason: "duplicate".to_string(),
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&payment).await.unwrap();
        assert_eq!(stored.status(), PaymentStatus::Refunded);
        assert_eq!(stored.refund_reason(), Some("duplicate"));
        assert!(stored.refunded_at().is_some());
    }
}
