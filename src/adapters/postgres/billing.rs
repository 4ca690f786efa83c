//! PostgreSQL implementations of PaymentRepository and InvoiceRepository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::session::{corrupt_row, driver_error, violated_unique_constraint, PgSession};
use crate::domain::foundation::{
    Currency, DomainError, InvoiceId, Money, PageRequest, PaginatedResult, PaymentId,
    SubscriptionId, Timestamp, UserId,
};
use crate::domain::invoice::{Invoice, InvoiceNumber, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::ports::{InvoiceRepository, PaymentRepository};

fn stored_money(entity: &str, column: &str, cents: i64, currency: &str) -> Result<Money, DomainError> {
    Currency::new(currency.trim())
        .and_then(|currency| Money::new(cents, currency))
        .map_err(|e| corrupt_row(entity, column, e))
}

// ════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════

const PAYMENT_COLUMNS: &str = "id, user_id, subscription_id, amount_cents, currency, method, \
     status, payment_date, transaction_id, description, processed_at, refund_reason, \
     refunded_at, created_at, updated_at";

pub struct PostgresPaymentRepository {
    session: Arc<PgSession>,
}

impl PostgresPaymentRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    subscription_id: Option<Uuid>,
    amount_cents: i64,
    currency: String,
    method: String,
    status: String,
    payment_date: DateTime<Utc>,
    transaction_id: Option<String>,
    description: Option<String>,
    processed_at: Option<DateTime<Utc>>,
    refund_reason: Option<String>,
    refunded_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let amount = stored_money("Payment", "amount", row.amount_cents, &row.currency)?;
        let method: PaymentMethod = row
            .method
            .parse()
            .map_err(|e| corrupt_row("Payment", "method", e))?;
        let status = PaymentStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row("Payment", "status", &row.status))?;

        Ok(Payment::reconstitute(
            PaymentId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.subscription_id.map(SubscriptionId::from_uuid),
            amount,
            method,
            status,
            Timestamp::from_datetime(row.payment_date),
            row.transaction_id,
            row.description,
            row.processed_at.map(Timestamp::from_datetime),
            row.refund_reason,
            row.refunded_at.map(Timestamp::from_datetime),
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn get_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE id = $1{}",
            PAYMENT_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, PaymentRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load payment", e))?
            .map(Payment::try_from)
            .transpose()
    }

    async fn exists(&self, id: &PaymentId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(sqlx::query_as("SELECT COUNT(*) FROM payments WHERE id = $1").bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("check payment", e))?;
        Ok(count > 0)
    }

    async fn add(&self, payment: &Payment) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO payments (
                        id, user_id, subscription_id, amount_cents, currency, method, status,
                        payment_date, transaction_id, description, processed_at, refund_reason,
                        refunded_at, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                    "#,
                )
                .bind(payment.id().as_uuid())
                .bind(payment.user_id().as_uuid())
                .bind(payment.subscription_id().map(|id| *id.as_uuid()))
                .bind(payment.amount().amount_cents())
                .bind(payment.amount().currency().as_str())
                .bind(payment.method().as_str())
                .bind(payment.status().as_str())
                .bind(payment.payment_date().as_datetime())
                .bind(payment.transaction_id())
                .bind(payment.description())
                .bind(payment.processed_at().map(|t| *t.as_datetime()))
                .bind(payment.refund_reason())
                .bind(payment.refunded_at().map(|t| *t.as_datetime()))
                .bind(payment.created_at().as_datetime())
                .bind(payment.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("insert payment", e))?;
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE payments SET
                        status = $2,
                        transaction_id = $3,
                        description = $4,
                        processed_at = $5,
                        refund_reason = $6,
                        refunded_at = $7,
                        updated_at = $8
                    WHERE id = $1
                    "#,
                )
                .bind(payment.id().as_uuid())
                .bind(payment.status().as_str())
                .bind(payment.transaction_id())
                .bind(payment.description())
                .bind(payment.processed_at().map(|t| *t.as_datetime()))
                .bind(payment.refund_reason())
                .bind(payment.refunded_at().map(|t| *t.as_datetime()))
                .bind(payment.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update payment", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Payment", payment.id()));
        }
        Ok(())
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Payment>, DomainError> {
        let status = status.map(|s| s.as_str());
        let total = self
            .session
            .count(
                sqlx::query_as(
                    "SELECT COUNT(*) FROM payments \
                     WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
                )
                .bind(user_id.as_uuid())
                .bind(status),
            )
            .await
            .map_err(|e| driver_error("count payments", e))?;

        let sql = format!(
            "SELECT {} FROM payments WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY payment_date DESC, id LIMIT $3 OFFSET $4",
            PAYMENT_COLUMNS
        );
        let payments = self
            .session
            .fetch_all(
                sqlx::query_as::<_, PaymentRow>(&sql)
                    .bind(user_id.as_uuid())
                    .bind(status)
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list payments", e))?
            .into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(payments, total, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════

const INVOICE_COLUMNS: &str = "id, user_id, payment_id, invoice_number, base_cents, tax_cents, \
     total_cents, currency, status, issue_date, due_date, paid_at, notes, created_at, updated_at";

pub struct PostgresInvoiceRepository {
    session: Arc<PgSession>,
}

impl PostgresInvoiceRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    user_id: Uuid,
    payment_id: Option<Uuid>,
    invoice_number: String,
    base_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    currency: String,
    status: String,
    issue_date: DateTime<Utc>,
    due_date: Option<NaiveDate>,
    paid_at: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let number = InvoiceNumber::parse(&row.invoice_number)
            .map_err(|e| corrupt_row("Invoice", "invoice_number", e))?;
        let status = InvoiceStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row("Invoice", "status", &row.status))?;

        Ok(Invoice::reconstitute(
            InvoiceId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.payment_id.map(PaymentId::from_uuid),
            number,
            stored_money("Invoice", "base_amount", row.base_cents, &row.currency)?,
            stored_money("Invoice", "tax_amount", row.tax_cents, &row.currency)?,
            stored_money("Invoice", "total_amount", row.total_cents, &row.currency)?,
            status,
            Timestamp::from_datetime(row.issue_date),
            row.due_date,
            row.paid_at.map(Timestamp::from_datetime),
            row.notes,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn get_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let sql = format!(
            "SELECT {} FROM invoices WHERE id = $1{}",
            INVOICE_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, InvoiceRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load invoice", e))?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn exists(&self, id: &InvoiceId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(sqlx::query_as("SELECT COUNT(*) FROM invoices WHERE id = $1").bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("check invoice", e))?;
        Ok(count > 0)
    }

    async fn add(&self, invoice: &Invoice) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO invoices (
                        id, user_id, payment_id, invoice_number, base_cents, tax_cents,
                        total_cents, currency, status, issue_date, due_date, paid_at, notes,
                        created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                    "#,
                )
                .bind(invoice.id().as_uuid())
                .bind(invoice.user_id().as_uuid())
                .bind(invoice.payment_id().map(|id| *id.as_uuid()))
                .bind(invoice.invoice_number().as_str())
                .bind(invoice.base_amount().amount_cents())
                .bind(invoice.tax_amount().amount_cents())
                .bind(invoice.total_amount().amount_cents())
                .bind(invoice.total_amount().currency().as_str())
                .bind(invoice.status().as_str())
                .bind(invoice.issue_date().as_datetime())
                .bind(invoice.due_date())
                .bind(invoice.paid_at().map(|t| *t.as_datetime()))
                .bind(invoice.notes())
                .bind(invoice.created_at().as_datetime())
                .bind(invoice.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| match violated_unique_constraint(&e).as_deref() {
                Some("invoices_invoice_number_key") => {
                    DomainError::duplicate("invoice_number", invoice.invoice_number())
                }
                _ => driver_error("insert invoice", e),
            })?;
        Ok(())
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE invoices SET
                        status = $2,
                        due_date = $3,
                        paid_at = $4,
                        notes = $5,
                        updated_at = $6
                    WHERE id = $1
                    "#,
                )
                .bind(invoice.id().as_uuid())
                .bind(invoice.status().as_str())
                .bind(invoice.due_date())
                .bind(invoice.paid_at().map(|t| *t.as_datetime()))
                .bind(invoice.notes())
                .bind(invoice.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update invoice", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Invoice", invoice.id()));
        }
        Ok(())
    }

    async fn find_by_number(&self, number: &InvoiceNumber) -> Result<Option<Invoice>, DomainError> {
        let sql = format!("SELECT {} FROM invoices WHERE invoice_number = $1", INVOICE_COLUMNS);
        self.session
            .fetch_optional(sqlx::query_as::<_, InvoiceRow>(&sql).bind(number.as_str()))
            .await
            .map_err(|e| driver_error("find invoice by number", e))?
            .map(Invoice::try_from)
            .transpose()
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<InvoiceStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Invoice>, DomainError> {
        let status = status.map(|s| s.as_str());
        let total = self
            .session
            .count(
                sqlx::query_as(
                    "SELECT COUNT(*) FROM invoices \
                     WHERE user_id = $1 AND ($2::text IS NULL OR status = $2)",
                )
                .bind(user_id.as_uuid())
                .bind(status),
            )
            .await
            .map_err(|e| driver_error("count invoices", e))?;

        let sql = format!(
            "SELECT {} FROM invoices WHERE user_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY issue_date DESC, id LIMIT $3 OFFSET $4",
            INVOICE_COLUMNS
        );
        let invoices = self
            .session
            .fetch_all(
                sqlx::query_as::<_, InvoiceRow>(&sql)
                    .bind(user_id.as_uuid())
                    .bind(status)
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list invoices", e))?
            .into_iter()
            .map(Invoice::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(invoices, total, page))
    }
}
