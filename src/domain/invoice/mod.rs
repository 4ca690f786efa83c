//! Invoice aggregate.
//!
//! A billing record for a member, optionally tied to the payment that
//! settles it. Totals are fixed at construction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{
    optional_text, DomainError, InvoiceId, Money, PaymentId, StateMachine, Timestamp, UserId,
    ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl StateMachine for InvoiceStatus {
    const AGGREGATE: &'static str = "Invoice";

    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (InvoiceStatus::Pending, InvoiceStatus::Paid))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            InvoiceStatus::Pending => vec![InvoiceStatus::Paid],
            InvoiceStatus::Paid => vec![],
        }
    }
}

/// Human-facing invoice number, `INV-YYYYMMDD-XXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    const PREFIX: &'static str = "INV-";

    /// Generates a number for an invoice issued on `issued_on`.
    pub fn generate(issued_on: NaiveDate) -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect();
        Self(format!(
            "{}{}-{}",
            Self::PREFIX,
            issued_on.format("%Y%m%d"),
            suffix.to_uppercase()
        ))
    }

    /// Parses and validates an invoice number.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim().to_uppercase();
        let invalid = || ValidationError::invalid_format("invoice_number", "expected INV-YYYYMMDD-XXXXXX");

        let rest = value.strip_prefix(Self::PREFIX).ok_or_else(invalid)?;
        let (date, suffix) = rest.split_once('-').ok_or_else(invalid)?;
        if NaiveDate::parse_from_str(date, "%Y%m%d").is_err() || date.len() != 8 {
            return Err(invalid());
        }
        if suffix.len() != 6 || !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        InvoiceNumber::parse(&value)
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.0
    }
}

/// Invoice aggregate.
///
/// # Invariants
///
/// - `total_amount == base_amount + tax_amount`, all in one currency
/// - `paid_at` is set exactly when status is `Paid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    user_id: UserId,
    payment_id: Option<PaymentId>,
    invoice_number: InvoiceNumber,
    base_amount: Money,
    tax_amount: Money,
    total_amount: Money,
    status: InvoiceStatus,
    issue_date: Timestamp,
    due_date: Option<NaiveDate>,
    paid_at: Option<Timestamp>,
    notes: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Invoice {
    /// Creates a pending invoice.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the amounts mix currencies or the total does
    ///   not equal base plus tax
    #[allow(clippy::too_many_arguments)]
    pub fn create_new(
        user_id: UserId,
        invoice_number: InvoiceNumber,
        base_amount: Money,
        tax_amount: Money,
        total_amount: Money,
        payment_id: Option<PaymentId>,
        due_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        let expected = base_amount.checked_add(&tax_amount)?;
        if expected != total_amount {
            return Err(DomainError::validation(
                "total_amount",
                format!(
                    "Total {} must equal base plus tax ({})",
                    total_amount, expected
                ),
            ));
        }

        let now = Timestamp::now();
        if let Some(due) = due_date {
            if due < now.date() {
                return Err(DomainError::validation(
                    "due_date",
                    "Due date cannot be in the past",
                ));
            }
        }

        Ok(Self {
            id: InvoiceId::new(),
            user_id,
            payment_id,
            invoice_number,
            base_amount,
            tax_amount,
            total_amount,
            status: InvoiceStatus::Pending,
            issue_date: now,
            due_date,
            paid_at: None,
            notes: optional_text(notes),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute an invoice from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: InvoiceId,
        user_id: UserId,
        payment_id: Option<PaymentId>,
        invoice_number: InvoiceNumber,
        base_amount: Money,
        tax_amount: Money,
        total_amount: Money,
        status: InvoiceStatus,
        issue_date: Timestamp,
        due_date: Option<NaiveDate>,
        paid_at: Option<Timestamp>,
        notes: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            payment_id,
            invoice_number,
            base_amount,
            tax_amount,
            total_amount,
            status,
            issue_date,
            due_date,
            paid_at,
            notes,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &InvoiceId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn payment_id(&self) -> Option<&PaymentId> {
        self.payment_id.as_ref()
    }

    pub fn invoice_number(&self) -> &InvoiceNumber {
        &self.invoice_number
    }

    pub fn base_amount(&self) -> &Money {
        &self.base_amount
    }

    pub fn tax_amount(&self) -> &Money {
        &self.tax_amount
    }

    pub fn total_amount(&self) -> &Money {
        &self.total_amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn issue_date(&self) -> &Timestamp {
        &self.issue_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn paid_at(&self) -> Option<&Timestamp> {
        self.paid_at.as_ref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Pending → Paid. One-way.
    pub fn mark_paid(&mut self, at: Timestamp) -> Result<(), DomainError> {
        self.status = self.status.transition_to(InvoiceStatus::Paid, "mark paid")?;
        self.paid_at = Some(at);
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, ErrorCode};
    use proptest::prelude::*;

    fn sar(cents: i64) -> Money {
        Money::new(cents, Currency::default_currency()).unwrap()
    }

    fn number() -> InvoiceNumber {
        InvoiceNumber::generate(Timestamp::now().date())
    }

    fn invoice(base: i64, tax: i64, total: i64) -> Result<Invoice, DomainError> {
        Invoice::create_new(
            UserId::new(),
            number(),
            sar(base),
            sar(tax),
            sar(total),
            None,
            None,
            None,
        )
    }

    #[test]
    fn generated_number_round_trips_through_parse() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let number = InvoiceNumber::generate(date);

        assert!(number.as_str().starts_with("INV-20240309-"));
        assert_eq!(InvoiceNumber::parse(number.as_str()).unwrap(), number);
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        assert!(InvoiceNumber::parse("INV-2024-ABCDEF").is_err());
        assert!(InvoiceNumber::parse("BILL-20240309-ABCDEF").is_err());
        assert!(InvoiceNumber::parse("INV-20241399-ABCDEF").is_err());
        assert!(InvoiceNumber::parse("INV-20240309-ABC").is_err());
    }

    #[test]
    fn mismatched_total_is_rejected() {
        let err = invoice(10_000, 1_500, 11_000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.contains_key("total_amount"));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let usd = Money::new(1_500, Currency::new("USD").unwrap()).unwrap();
        let err = Invoice::create_new(
            UserId::new(),
            number(),
            sar(10_000),
            usd,
            sar(11_500),
            None,
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn past_due_date_is_rejected() {
        let yesterday = Timestamp::now().add_days(-1).date();
        let err = Invoice::create_new(
            UserId::new(),
            number(),
            sar(100),
            sar(0),
            sar(100),
            None,
            Some(yesterday),
            None,
        )
        .unwrap_err();
        assert!(err.details.contains_key("due_date"));
    }

    #[test]
    fn mark_paid_is_one_way() {
        let mut invoice = invoice(10_000, 1_500, 11_500).unwrap();
        let at = Timestamp::now();

        invoice.mark_paid(at).unwrap();
        assert_eq!(invoice.status(), InvoiceStatus::Paid);
        assert_eq!(invoice.paid_at(), Some(&at));

        let err = invoice.mark_paid(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(invoice.paid_at(), Some(&at));
    }

    proptest! {
        #[test]
        fn total_always_equals_base_plus_tax(base in 0i64..1_000_000_000, tax in 0i64..1_000_000_000) {
            let invoice = invoice(base, tax, base + tax).unwrap();
            prop_assert_eq!(
                invoice.total_amount().amount_cents(),
                invoice.base_amount().amount_cents() + invoice.tax_amount().amount_cents()
            );
        }

        #[test]
        fn any_other_total_is_rejected(base in 0i64..1_000_000, tax in 0i64..1_000_000, delta in 1i64..1_000) {
            prop_assert!(invoice(base, tax, base + tax + delta).is_err());
        }
    }
}
