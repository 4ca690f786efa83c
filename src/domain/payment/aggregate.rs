//! Payment aggregate.

use serde::{Deserialize, Serialize};

use super::status::{PaymentMethod, PaymentStatus};
use crate::domain::foundation::{
    optional_text, required_text, DomainError, Money, PaymentId, StateMachine, SubscriptionId,
    Timestamp, UserId,
};

/// A monetary transaction made by a member.
///
/// # Invariants
///
/// - `amount` is strictly positive
/// - `transaction_id` is present once processed
/// - `refund_reason` and `refunded_at` are present once refunded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    user_id: UserId,
    subscription_id: Option<SubscriptionId>,
    amount: Money,
    method: PaymentMethod,
    status: PaymentStatus,
    payment_date: Timestamp,
    transaction_id: Option<String>,
    description: Option<String>,
    processed_at: Option<Timestamp>,
    refund_reason: Option<String>,
    refunded_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Payment {
    /// Records a new pending payment.
    pub fn create_new(
        user_id: UserId,
        amount: Money,
        method: PaymentMethod,
        subscription_id: Option<SubscriptionId>,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        if !amount.is_positive() {
            return Err(DomainError::validation(
                "amount",
                "Payment amount must be greater than zero",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: PaymentId::new(),
            user_id,
            subscription_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            payment_date: now,
            transaction_id: None,
            description: optional_text(description),
            processed_at: None,
            refund_reason: None,
            refunded_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a payment from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PaymentId,
        user_id: UserId,
        subscription_id: Option<SubscriptionId>,
        amount: Money,
        method: PaymentMethod,
        status: PaymentStatus,
        payment_date: Timestamp,
        transaction_id: Option<String>,
        description: Option<String>,
        processed_at: Option<Timestamp>,
        refund_reason: Option<String>,
        refunded_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            subscription_id,
            amount,
            method,
            status,
            payment_date,
            transaction_id,
            description,
            processed_at,
            refund_reason,
            refunded_at,
            created_at,
            updated_at,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> &PaymentId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn subscription_id(&self) -> Option<&SubscriptionId> {
        self.subscription_id.as_ref()
    }

    pub fn amount(&self) -> &Money {
        &self.amount
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn payment_date(&self) -> &Timestamp {
        &self.payment_date
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn processed_at(&self) -> Option<&Timestamp> {
        self.processed_at.as_ref()
    }

    pub fn refund_reason(&self) -> Option<&str> {
        self.refund_reason.as_deref()
    }

    pub fn refunded_at(&self) -> Option<&Timestamp> {
        self.refunded_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ════════════════════════════════════════════════════════════════════════
    // Behaviors
    // ════════════════════════════════════════════════════════════════════════

    /// Pending → Processed with the provider's transaction id.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the transaction id is blank
    /// - `ConflictingState` if the payment is not pending
    pub fn process(&mut self, transaction_id: impl Into<String>) -> Result<(), DomainError> {
        let next = self
            .status
            .transition_to(PaymentStatus::Processed, "process")?;
        let transaction_id = required_text("transaction_id", transaction_id)?;

        let now = Timestamp::now();
        self.status = next;
        self.transaction_id = Some(transaction_id);
        self.processed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Processed → Refunded, recording why.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the reason is blank
    /// - `ConflictingState` if the payment is not processed
    pub fn refund(&mut self, reason: impl Into<String>) -> Result<(), DomainError> {
        let next = self.status.transition_to(PaymentStatus::Refunded, "refund")?;
        let reason = required_text("reason", reason)?;

        let now = Timestamp::now();
        self.status = next;
        self.refund_reason = Some(reason);
        self.refunded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}
