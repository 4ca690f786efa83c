//! ProcessPaymentHandler - Confirms a pending payment.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, PaymentId};
use crate::ports::{NotificationSender, PaymentRepository, UnitOfWork, UserRepository};

const MAX_TRANSACTION_ID_LENGTH: usize = 100;

#[derive(Debug, Clone)]
pub struct ProcessPaymentCommand {
    pub payment_id: PaymentId,
    /// Reference issued by the payment gateway.
    pub transaction_id: String,
}

impl Validate for ProcessPaymentCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("transaction_id", &self.transaction_id)
            .max_length(
                "transaction_id",
                &self.transaction_id,
                MAX_TRANSACTION_ID_LENGTH,
            )
            .finish()
    }
}

impl Request for ProcessPaymentCommand {
    type Output = ();
    const NAME: &'static str = "ProcessPayment";
}

/// Pending → Processed. The confirmation e-mail is sent after commit and is
/// not part of the transaction: if it fails the payment stays processed.
pub struct ProcessPaymentHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl ProcessPaymentHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            uow,
            users,
            payments,
            notifier,
        }
    }
}

#[async_trait]
impl RequestHandler<ProcessPaymentCommand> for ProcessPaymentHandler {
    async fn handle(&self, cmd: ProcessPaymentCommand) -> Result<(), DomainError> {
        let ProcessPaymentCommand {
            payment_id,
            transaction_id,
        } = cmd;

        let payment = in_transaction(self.uow.as_ref(), async move {
            let mut payment = self
                .payments
                .get_by_id(&payment_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Payment", payment_id))?;
            payment.process(transaction_id)?;
            self.payments.update(&payment).await?;
            Ok(payment)
        })
        .await?;

        let transaction_id = payment.transaction_id().unwrap_or_default();
        tracing::info!(
            payment_id = %payment_id,
            transaction_id = %transaction_id,
            "Payment processed"
        );

        // Owner is read after commit so only the payment row is locked.
        let user = match self.users.get_by_id(payment.user_id()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::warn!(
                    payment_id = %payment_id,
                    user_id = %payment.user_id(),
                    "Payment owner not found, confirmation skipped"
                );
                return Ok(());
            }
            Err(err) => {
                tracing::warn!(
                    payment_id = %payment_id,
                    error = %err,
                    "Payment owner lookup failed, confirmation skipped"
                );
                return Ok(());
            }
        };

        if let Err(err) = self
            .notifier
            .send_payment_confirmation(
                user.email(),
                user.first_name(),
                payment.amount(),
                transaction_id,
            )
            .await
        {
            tracing::warn!(
                payment_id = %payment_id,
                error = %err,
                "Payment confirmation failed"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notification::RecordedNotification;
    use crate::application::handlers::test_support::{sar, TestContext};
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};

    async fn pending(ctx: &TestContext) -> Payment {
        let user = ctx.seed_user("abeer@example.com").await;
        let payment = Payment::create_new(*user.id(), sar(10_000), PaymentMethod::Cash, None, None)
            .unwrap();
        ctx.scope().payments.add(&payment).await.unwrap();
        payment
    }

    #[tokio::test]
    async fn processes_and_confirms() {
        let ctx = TestContext::new();
        let payment = pending(&ctx).await;

        ctx.dispatcher
            .send(ProcessPaymentCommand {
                payment_id: *payment.id(),
                transaction_id: "TXN1".to_string(),
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&payment).await.unwrap();
        assert_eq!(stored.status(), PaymentStatus::Processed);
        assert_eq!(stored.transaction_id(), Some("TXN1"));
        assert_eq!(
            ctx.notifier.sent(),
            vec![RecordedNotification::PaymentConfirmation {
                to: "abeer@example.com".to_string(),
                first_name: "Sara".to_string(),
                amount: sar(10_000),
                transaction_id: "TXN1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn confirmation_failure_keeps_payment_processed() {
        let ctx = TestContext::new();
        let payment = pending(&ctx).await;
        ctx.notifier.fail_all();

        ctx.dispatcher
            .send(ProcessPaymentCommand {
                payment_id: *payment.id(),
                transaction_id: "TXN1".to_string(),
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&payment).await.unwrap();
        assert_eq!(stored.status(), PaymentStatus::Processed);
    }

    #[tokio::test]
    async fn missing_owner_skips_confirmation_after_commit() {
        let ctx = TestContext::new();
        let payment = Payment::create_new(UserId::new(), sar(5_000), PaymentMethod::Card, None, None)
            .unwrap();
        ctx.scope().payments.add(&payment).await.unwrap();

        ctx.dispatcher
            .send(ProcessPaymentCommand {
                payment_id: *payment.id(),
                transaction_id: "TXN7".to_string(),
            })
            .await
            .unwrap();

        let stored = ctx.store.committed(&payment).await.unwrap();
        assert_eq!(stored.status(), PaymentStatus::Processed);
        assert!(ctx.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn processing_twice_is_conflicting_state() {
        let ctx = TestContext::new();
        let payment = pending(&ctx).await;
        let cmd = ProcessPaymentCommand {
            payment_id: *payment.id(),
            transaction_id: "TXN1".to_string(),
        };
        ctx.dispatcher.send(cmd.clone()).await.unwrap();

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(ctx.notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn blank_transaction_id_fails_the_gate() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(ProcessPaymentCommand {
                payment_id: PaymentId::new(),
                transaction_id: " ".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn commit_failure_rolls_back_and_skips_confirmation() {
        let ctx = TestContext::new();
        let payment = pending(&ctx).await;
        ctx.store.fail_next_commit(DomainError::database("connection reset"));

        let err = ctx
            .dispatcher
            .send(ProcessPaymentCommand {
                payment_id: *payment.id(),
                transaction_id: "TXN1".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(
            ctx.store.committed(&payment).await.unwrap().status(),
            PaymentStatus::Pending
        );
        assert!(ctx.notifier.sent().is_empty());
    }
}
