//! Request DTOs for billing endpoints.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::application::handlers::invoices::CreateInvoiceCommand;
use crate::application::handlers::payments::CreatePaymentCommand;
use crate::domain::foundation::{PaymentId, SubscriptionId, Timestamp, UserId};
use crate::domain::invoice::InvoiceStatus;
use crate::domain::payment::{PaymentMethod, PaymentStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub user_id: UserId,
    /// Decimal string, e.g. `"299.00"`.
    pub amount: String,
    pub currency: Option<String>,
    pub method: PaymentMethod,
    pub subscription_id: Option<SubscriptionId>,
    pub description: Option<String>,
}

impl From<CreatePaymentRequest> for CreatePaymentCommand {
    fn from(r: CreatePaymentRequest) -> Self {
        Self {
            user_id: r.user_id,
            amount: r.amount,
            currency: r.currency,
            method: r.method,
            subscription_id: r.subscription_id,
            description: r.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessPaymentRequest {
    pub transaction_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefundPaymentRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPaymentsParams {
    pub status: Option<PaymentStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub user_id: UserId,
    pub base_amount: String,
    pub tax_amount: Option<String>,
    pub currency: Option<String>,
    pub payment_id: Option<PaymentId>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl From<CreateInvoiceRequest> for CreateInvoiceCommand {
    fn from(r: CreateInvoiceRequest) -> Self {
        Self {
            user_id: r.user_id,
            base_amount: r.base_amount,
            tax_amount: r.tax_amount,
            currency: r.currency,
            payment_id: r.payment_id,
            due_date: r.due_date,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkPaidRequest {
    pub paid_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListInvoicesParams {
    pub status: Option<InvoiceStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}
