//! CreatePlanHandler - Adds a subscription plan to the catalogue.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::policy::BillingPolicy;
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{Currency, DomainError, FieldError, Money, PlanId};
use crate::domain::subscription::{SubscriptionPlan, MAX_DURATION_DAYS, MAX_NAME_LENGTH};
use crate::ports::{PlanRepository, UnitOfWork};

#[derive(Debug, Clone)]
pub struct CreatePlanCommand {
    pub name: String,
    pub description: Option<String>,
    /// Decimal amount, e.g. `"299.00"`.
    pub price: String,
    /// Defaults to the billing currency.
    pub currency: Option<String>,
    pub duration_days: u32,
    pub features: Vec<String>,
}

impl Validate for CreatePlanCommand {
    fn validate(&self) -> Vec<FieldError> {
        let mut rules = Rules::new();
        rules
            .required("name", &self.name)
            .max_length("name", &self.name, MAX_NAME_LENGTH)
            .range(
                "duration_days",
                self.duration_days as i64,
                1,
                MAX_DURATION_DAYS as i64,
            );
        if let Some(code) = &self.currency {
            rules.parsed(Currency::new(code));
        }
        rules
            .parsed_as(
                "price",
                Money::from_decimal_str(&self.price, Currency::default_currency()),
            )
            .finish()
    }
}

impl Request for CreatePlanCommand {
    type Output = PlanId;
    const NAME: &'static str = "CreatePlan";
}

pub struct CreatePlanHandler {
    uow: Arc<dyn UnitOfWork>,
    plans: Arc<dyn PlanRepository>,
    billing: BillingPolicy,
}

impl CreatePlanHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        plans: Arc<dyn PlanRepository>,
        billing: BillingPolicy,
    ) -> Self {
        Self {
            uow,
            plans,
            billing,
        }
    }
}

#[async_trait]
impl RequestHandler<CreatePlanCommand> for CreatePlanHandler {
    async fn handle(&self, cmd: CreatePlanCommand) -> Result<PlanId, DomainError> {
        let currency = match cmd.currency {
            Some(code) => Currency::new(code)?,
            None => self.billing.default_currency.clone(),
        };
        let price = Money::from_decimal_str(&cmd.price, currency)?;
        let plan = SubscriptionPlan::create_new(
            cmd.name,
            cmd.description,
            price,
            cmd.duration_days,
            cmd.features,
        )?;
        let plan_id = *plan.id();

        in_transaction(self.uow.as_ref(), async {
            self.plans.add(&plan).await
        })
        .await?;

        tracing::info!(plan_id = %plan_id, name = %plan.name(), price = %plan.price(), "Plan created");
        Ok(plan_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::ErrorCode;

    fn command(price: &str) -> CreatePlanCommand {
        CreatePlanCommand {
            name: "Monthly".to_string(),
            description: Some("Full gym access".to_string()),
            price: price.to_string(),
            currency: None,
            duration_days: 30,
            features: vec!["Sauna".to_string(), " ".to_string()],
        }
    }

    #[tokio::test]
    async fn creates_plan_in_billing_currency() {
        let ctx = TestContext::new();

        let id = ctx.dispatcher.send(command("299.00")).await.unwrap();

        let plan = ctx.scope().plans.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(plan.price().amount_cents(), 29_900);
        assert_eq!(plan.price().currency().as_str(), "SAR");
        assert_eq!(plan.features(), &["Sauna".to_string()]);
        assert!(plan.is_active());
    }

    #[tokio::test]
    async fn zero_price_is_rejected() {
        let ctx = TestContext::new();

        let err = ctx.dispatcher.send(command("0")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(ctx.store.count::<SubscriptionPlan>().await, 0);
    }

    #[tokio::test]
    async fn gate_rejects_malformed_price_and_currency() {
        let ctx = TestContext::new();
        let mut cmd = command("12.345");
        cmd.currency = Some("riyal".to_string());
        cmd.duration_days = 0;

        let err = ctx.dispatcher.send(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.contains_key("duration_days"));
        assert!(err.details.contains_key("currency"));
        assert!(err.details.contains_key("price"));
    }
}
