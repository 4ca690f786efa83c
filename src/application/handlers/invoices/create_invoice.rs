//! CreateInvoiceHandler - Issues an invoice to a member.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::policy::BillingPolicy;
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{
    Currency, DomainError, FieldError, InvoiceId, Money, PaymentId, Timestamp, UserId,
};
use crate::domain::invoice::{Invoice, InvoiceNumber};
use crate::ports::{InvoiceRepository, PaymentRepository, UnitOfWork, UserRepository};

/// Attempts at drawing an unused invoice number.
const NUMBER_ATTEMPTS: usize = 5;

const MAX_NOTES_LENGTH: usize = 1_000;

#[derive(Debug, Clone)]
pub struct CreateInvoiceCommand {
    pub user_id: UserId,
    /// Decimal amount before tax.
    pub base_amount: String,
    /// Decimal tax amount. Computed from the billing tax rate when absent.
    pub tax_amount: Option<String>,
    pub currency: Option<String>,
    pub payment_id: Option<PaymentId>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Validate for CreateInvoiceCommand {
    fn validate(&self) -> Vec<FieldError> {
        let currency = Currency::default_currency();
        let mut rules = Rules::new();
        let base = Money::from_decimal_str(&self.base_amount, currency.clone());
        rules.check(
            "base_amount",
            base.as_ref().map_or(true, Money::is_positive),
            "must be greater than zero",
        );
        rules.parsed_as("base_amount", base);
        if let Some(tax) = &self.tax_amount {
            rules.parsed_as("tax_amount", Money::from_decimal_str(tax, currency));
        }
        if let Some(code) = &self.currency {
            rules.parsed(Currency::new(code));
        }
        rules
            .check(
                "due_date",
                self.due_date.map_or(true, |d| d >= Timestamp::now().date()),
                "cannot be in the past",
            )
            .max_length(
                "notes",
                self.notes.as_deref().unwrap_or_default(),
                MAX_NOTES_LENGTH,
            )
            .finish()
    }
}

impl Request for CreateInvoiceCommand {
    type Output = CreatedInvoice;
    const NAME: &'static str = "CreateInvoice";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedInvoice {
    pub invoice_id: InvoiceId,
    pub invoice_number: InvoiceNumber,
}

/// Total is always base plus tax. A linked payment must belong to the
/// member being invoiced.
pub struct CreateInvoiceHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    billing: BillingPolicy,
}

impl CreateInvoiceHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        billing: BillingPolicy,
    ) -> Self {
        Self {
            uow,
            users,
            payments,
            invoices,
            billing,
        }
    }

    async fn unused_number(&self, issued_on: NaiveDate) -> Result<InvoiceNumber, DomainError> {
        for _ in 0..NUMBER_ATTEMPTS {
            let number = InvoiceNumber::generate(issued_on);
            if self.invoices.find_by_number(&number).await?.is_none() {
                return Ok(number);
            }
            tracing::debug!(invoice_number = %number, "Invoice number taken, drawing again");
        }
        Err(DomainError::internal("Could not allocate an unused invoice number"))
    }
}

#[async_trait]
impl RequestHandler<CreateInvoiceCommand> for CreateInvoiceHandler {
    async fn handle(&self, cmd: CreateInvoiceCommand) -> Result<CreatedInvoice, DomainError> {
        let currency = match &cmd.currency {
            Some(code) => Currency::new(code)?,
            None => self.billing.default_currency.clone(),
        };
        let base = Money::from_decimal_str(&cmd.base_amount, currency.clone())?;
        let tax = match &cmd.tax_amount {
            Some(tax) => Money::from_decimal_str(tax, currency)?,
            None => self.billing.tax_for(&base),
        };
        let total = base.checked_add(&tax)?;
        let user_id = cmd.user_id;

        let invoice = in_transaction(self.uow.as_ref(), async move {
            if !self.users.exists(&cmd.user_id).await? {
                return Err(DomainError::not_found("User", cmd.user_id));
            }
            if let Some(payment_id) = &cmd.payment_id {
                let owned = self
                    .payments
                    .get_by_id(payment_id)
                    .await?
                    .map_or(false, |p| p.user_id() == &cmd.user_id);
                if !owned {
                    return Err(DomainError::not_found("Payment", payment_id));
                }
            }

            let number = self.unused_number(Timestamp::now().date()).await?;
            let invoice = Invoice::create_new(
                cmd.user_id,
                number,
                base,
                tax,
                total,
                cmd.payment_id,
                cmd.due_date,
                cmd.notes,
            )?;
            self.invoices.add(&invoice).await?;
            Ok(invoice)
        })
        .await?;

        tracing::info!(
            user_id = %user_id,
            invoice_id = %invoice.id(),
            invoice_number = %invoice.invoice_number(),
            total = %invoice.total_amount(),
            "Invoice issued"
        );
        Ok(CreatedInvoice {
            invoice_id: *invoice.id(),
            invoice_number: invoice.invoice_number().clone(),
        })
    }
}
