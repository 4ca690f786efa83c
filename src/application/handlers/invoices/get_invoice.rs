//! GetInvoiceByIdHandler - Query handler for one invoice.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::InvoiceView;
use crate::domain::foundation::{DomainError, FieldError, InvoiceId};
use crate::ports::InvoiceRepository;

#[derive(Debug, Clone)]
pub struct GetInvoiceByIdQuery {
    pub invoice_id: InvoiceId,
}

impl Validate for GetInvoiceByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetInvoiceByIdQuery {
    type Output = InvoiceView;
    const NAME: &'static str = "GetInvoiceById";
}

pub struct GetInvoiceByIdHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl GetInvoiceByIdHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }
}

#[async_trait]
impl RequestHandler<GetInvoiceByIdQuery> for GetInvoiceByIdHandler {
    async fn handle(&self, query: GetInvoiceByIdQuery) -> Result<InvoiceView, DomainError> {
        self.invoices
            .get_by_id(&query.invoice_id)
            .await?
            .map(|invoice| InvoiceView::from(&invoice))
            .ok_or_else(|| DomainError::not_found("Invoice", query.invoice_id))
    }
}
