//! GetPaymentByIdHandler - Query handler for one payment.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::PaymentView;
use crate::domain::foundation::{DomainError, FieldError, PaymentId};
use crate::ports::PaymentRepository;

#[derive(Debug, Clone)]
pub struct GetPaymentByIdQuery {
    pub payment_id: PaymentId,
}

impl Validate for GetPaymentByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetPaymentByIdQuery {
    type Output = PaymentView;
    const NAME: &'static str = "GetPaymentById";
}

pub struct GetPaymentByIdHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl GetPaymentByIdHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }
}

#[async_trait]
impl RequestHandler<GetPaymentByIdQuery> for GetPaymentByIdHandler {
    async fn handle(&self, query: GetPaymentByIdQuery) -> Result<PaymentView, DomainError> {
        self.payments
            .get_by_id(&query.payment_id)
            .await?
            .map(|payment| PaymentView::from(&payment))
            .ok_or_else(|| DomainError::not_found("Payment", query.payment_id))
    }
}
