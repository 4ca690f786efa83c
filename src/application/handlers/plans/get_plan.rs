//! GetPlanByIdHandler - Query handler for one plan.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::PlanView;
use crate::domain::foundation::{DomainError, FieldError, PlanId};
use crate::ports::PlanRepository;

#[derive(Debug, Clone)]
pub struct GetPlanByIdQuery {
    pub plan_id: PlanId,
}

impl Validate for GetPlanByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetPlanByIdQuery {
    type Output = PlanView;
    const NAME: &'static str = "GetPlanById";
}

pub struct GetPlanByIdHandler {
    plans: Arc<dyn PlanRepository>,
}

impl GetPlanByIdHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl RequestHandler<GetPlanByIdQuery> for GetPlanByIdHandler {
    async fn handle(&self, query: GetPlanByIdQuery) -> Result<PlanView, DomainError> {
        self.plans
            .get_by_id(&query.plan_id)
            .await?
            .map(|plan| PlanView::from(&plan))
            .ok_or_else(|| DomainError::not_found("SubscriptionPlan", query.plan_id))
    }
}
