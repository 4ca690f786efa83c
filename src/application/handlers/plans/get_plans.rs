//! GetPlansHandler - Paged plan catalogue.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::PlanView;
use crate::domain::foundation::{DomainError, FieldError, PageRequest, PaginatedResult};
use crate::ports::{PlanFilter, PlanRepository};

#[derive(Debug, Clone, Default)]
pub struct GetPlansQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub active_only: bool,
}

impl Validate for GetPlansQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetPlansQuery {
    type Output = PaginatedResult<PlanView>;
    const NAME: &'static str = "GetPlans";
}

pub struct GetPlansHandler {
    plans: Arc<dyn PlanRepository>,
}

impl GetPlansHandler {
    pub fn new(plans: Arc<dyn PlanRepository>) -> Self {
        Self { plans }
    }
}

#[async_trait]
impl RequestHandler<GetPlansQuery> for GetPlansHandler {
    async fn handle(&self, query: GetPlansQuery) -> Result<PaginatedResult<PlanView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        let filter = PlanFilter {
            active_only: query.active_only,
        };
        let plans = self.plans.get_paginated(filter, page).await?;
        Ok(plans.map(|plan| PlanView::from(&plan)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::plans::GetPlanByIdQuery;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::PlanId;

    #[tokio::test]
    async fn active_only_hides_retired_plans() {
        let ctx = TestContext::new();
        ctx.seed_plan("Monthly", 29_900, 30).await;
        let mut retired = ctx.seed_plan("Legacy", 9_900, 30).await;
        retired.deactivate().unwrap();
        ctx.scope().plans.update(&retired).await.unwrap();

        let all = ctx.dispatcher.send(GetPlansQuery::default()).await.unwrap();
        let active = ctx
            .dispatcher
            .send(GetPlansQuery {
                active_only: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(all.total_count, 2);
        assert_eq!(active.total_count, 1);
        assert_eq!(active.items[0].name, "Monthly");
        assert_eq!(active.items[0].price.amount, "299.00");
    }

    #[tokio::test]
    async fn plan_by_id_reports_not_found() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(GetPlanByIdQuery {
                plan_id: PlanId::new(),
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
