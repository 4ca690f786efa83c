//! GetUserPaymentsHandler - Paged payment history for one member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::PaymentView;
use crate::domain::foundation::{DomainError, FieldError, PageRequest, PaginatedResult, UserId};
use crate::domain::payment::PaymentStatus;
use crate::ports::{PaymentRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct GetUserPaymentsQuery {
    pub user_id: UserId,
    pub status: Option<PaymentStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Validate for GetUserPaymentsQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetUserPaymentsQuery {
    type Output = PaginatedResult<PaymentView>;
    const NAME: &'static str = "GetUserPayments";
}

pub struct GetUserPaymentsHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl GetUserPaymentsHandler {
    pub fn new(users: Arc<dyn UserRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { users, payments }
    }
}

#[async_trait]
impl RequestHandler<GetUserPaymentsQuery> for GetUserPaymentsHandler {
    async fn handle(
        &self,
        query: GetUserPaymentsQuery,
    ) -> Result<PaginatedResult<PaymentView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        if !self.users.exists(&query.user_id).await? {
            return Err(DomainError::not_found("User", query.user_id));
        }

        let payments = self
            .payments
            .get_paginated_for_user(&query.user_id, query.status, page)
            .await?;
        Ok(payments.map(|payment| PaymentView::from(&payment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::payments::GetPaymentByIdQuery;
    use crate::application::handlers::test_support::{sar, TestContext};
    use crate::domain::foundation::{ErrorCode, PaymentId};
    use crate::domain::payment::{Payment, PaymentMethod};

    fn query(user_id: UserId, status: Option<PaymentStatus>) -> GetUserPaymentsQuery {
        GetUserPaymentsQuery {
            user_id,
            status,
            page: None,
            page_size: None,
        }
    }

    #[tokio::test]
    async fn status_filter_narrows_history() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("dana@example.com").await;
        let pending =
            Payment::create_new(*user.id(), sar(1_000), PaymentMethod::Cash, None, None).unwrap();
        let mut processed =
            Payment::create_new(*user.id(), sar(2_000), PaymentMethod::Card, None, None).unwrap();
        processed.process("TXN-1").unwrap();
        let scope = ctx.scope();
        scope.payments.add(&pending).await.unwrap();
        scope.payments.add(&processed).await.unwrap();

        let all = ctx.dispatcher.send(query(*user.id(), None)).await.unwrap();
        let done = ctx
            .dispatcher
            .send(query(*user.id(), Some(PaymentStatus::Processed)))
            .await
            .unwrap();

        assert_eq!(all.total_count, 2);
        assert_eq!(done.total_count, 1);
        assert_eq!(done.items[0].id, *processed.id());
        assert_eq!(done.items[0].transaction_id.as_deref(), Some("TXN-1"));
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let ctx = TestContext::new();

        let err = ctx.dispatcher.send(query(UserId::new(), None)).await.unwrap_err();

        assert_eq!(err.detail("entity"), Some("User"));
    }

    #[tokio::test]
    async fn zero_page_size_is_rejected_by_gate() {
        let ctx = TestContext::new();
        let mut q = query(UserId::new(), None);
        q.page_size = Some(0);

        let err = ctx.dispatcher.send(q).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn payment_by_id_reports_not_found() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(GetPaymentByIdQuery {
                payment_id: PaymentId::new(),
            })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
