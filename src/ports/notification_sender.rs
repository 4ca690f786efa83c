//! Notification port.
//!
//! Outbound member notifications. The core only decides *that* a message is
//! sent; delivery guarantees belong to the adapter.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Money, Timestamp};

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Greets a newly registered member.
    async fn send_welcome(&self, to: &str, first_name: &str) -> Result<(), DomainError>;

    /// Confirms a processed payment.
    async fn send_payment_confirmation(
        &self,
        to: &str,
        first_name: &str,
        amount: &Money,
        transaction_id: &str,
    ) -> Result<(), DomainError>;

    /// Reminds a member of an upcoming session.
    async fn send_workout_reminder(
        &self,
        to: &str,
        first_name: &str,
        session_time: &Timestamp,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn NotificationSender) {}
    }
}
