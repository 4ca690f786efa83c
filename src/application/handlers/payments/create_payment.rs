//! CreatePaymentHandler - Records a pending payment for a member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::policy::BillingPolicy;
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{
    Currency, DomainError, FieldError, Money, PaymentId, SubscriptionId, UserId,
};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::ports::{PaymentRepository, UnitOfWork, UserRepository};

const MAX_DESCRIPTION_LENGTH: usize = 500;

#[derive(Debug, Clone)]
pub struct CreatePaymentCommand {
    pub user_id: UserId,
    /// Decimal amount, e.g. `"100.00"`.
    pub amount: String,
    /// Defaults to the billing currency.
    pub currency: Option<String>,
    pub method: PaymentMethod,
    pub subscription_id: Option<SubscriptionId>,
    pub description: Option<String>,
}

impl Validate for CreatePaymentCommand {
    fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules.parsed(Money::from_decimal_str(
            &self.amount,
            Currency::default_currency(),
        ));
        if let Some(code) = &self.currency {
            rules.parsed(Currency::new(code));
        }
        rules
            .max_length(
                "description",
                self.description.as_deref().unwrap_or_default(),
                MAX_DESCRIPTION_LENGTH,
            )
            .finish()
    }
}

impl Request for CreatePaymentCommand {
    type Output = PaymentId;
    const NAME: &'static str = "CreatePayment";
}

/// The member is loaded before any money value is built. A referenced
/// subscription must belong to that member.
pub struct CreatePaymentHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    billing: BillingPolicy,
}

impl CreatePaymentHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        billing: BillingPolicy,
    ) -> Self {
        Self {
            uow,
            users,
            payments,
            billing,
        }
    }
}

#[async_trait]
impl RequestHandler<CreatePaymentCommand> for CreatePaymentHandler {
    async fn handle(&self, cmd: CreatePaymentCommand) -> Result<PaymentId, DomainError> {
        let user_id = cmd.user_id;

        let payment = in_transaction(self.uow.as_ref(), async move {
            let user = self
                .users
                .get_by_id(&cmd.user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", cmd.user_id))?;
            if let Some(subscription_id) = &cmd.subscription_id {
                if user.subscription(subscription_id).is_none() {
                    return Err(DomainError::not_found("UserSubscription", subscription_id));
                }
            }

            let currency = match cmd.currency {
                Some(code) => Currency::new(code)?,
                None => self.billing.default_currency.clone(),
            };
            let amount = Money::from_decimal_str(&cmd.amount, currency)?;

            let payment = Payment::create_new(
                cmd.user_id,
                amount,
                cmd.method,
                cmd.subscription_id,
                cmd.description,
            )?;
            self.payments.add(&payment).await?;
            Ok(payment)
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            payment_id = %payment.id(),
            amount = %payment.amount(),
            method = %payment.method(),
            "Payment recorded"
        );
        Ok(*payment.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::domain::payment::PaymentStatus;

    fn command(user_id: UserId, amount: &str) -> CreatePaymentCommand {
        CreatePaymentCommand {
            user_id,
            amount: amount.to_string(),
            currency: None,
            method: PaymentMethod::Card,
            subscription_id: None,
            description: Some("Monthly fee".to_string()),
        }
    }

    #[tokio::test]
    async fn records_pending_payment_in_default_currency() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("abeer@example.com").await;

        let id = ctx.dispatcher.send(command(*user.id(), "100")).await.unwrap();

        let payment = ctx.scope().payments.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(payment.status(), PaymentStatus::Pending);
        assert_eq!(payment.amount().amount_cents(), 10_000);
        assert_eq!(payment.amount().currency().as_str(), "SAR");
    }

    #[tokio::test]
    async fn explicit_currency_is_kept() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("abeer@example.com").await;
        let mut cmd = command(*user.id(), "49.99");
        cmd.currency = Some("usd".to_string());

        let id = ctx.dispatcher.send(cmd).await.unwrap();

        let payment = ctx.scope().payments.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(payment.amount().currency().as_str(), "USD");
    }

    #[tokio::test]
    async fn unknown_member_is_checked_before_amount() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(command(UserId::new(), "0"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("abeer@example.com").await;

        let err = ctx.dispatcher.send(command(*user.id(), "0.00")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(ctx.store.count::<Payment>().await, 0);
    }

    #[tokio::test]
    async fn subscription_of_another_member_is_not_found() {
        let ctx = TestContext::new();
        let mut owner = ctx.seed_user("owner@example.com").await;
        let plan = ctx.seed_plan("Monthly", 29_900, 30).await;
        let subscription_id = owner.subscribe(&plan, Timestamp::now()).unwrap();
        ctx.scope().users.update(&owner).await.unwrap();
        let payer = ctx.seed_user("payer@example.com").await;
        let mut cmd = command(*payer.id(), "299.00");
        cmd.subscription_id = Some(subscription_id);

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.detail("entity"), Some("UserSubscription"));
    }
}
