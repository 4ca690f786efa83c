//! UserSubscription child entity.
//!
//! Binds a user to a plan for a fixed window. Owned and persisted by the
//! `User` aggregate; never mutated outside of it.

use serde::{Deserialize, Serialize};

use super::status::SubscriptionStatus;
use crate::domain::foundation::{
    DomainError, Money, PlanId, StateMachine, SubscriptionId, Timestamp, UserId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubscription {
    id: SubscriptionId,
    user_id: UserId,
    plan_id: PlanId,
    plan_name: String,
    price: Money,
    start_date: Timestamp,
    end_date: Timestamp,
    status: SubscriptionStatus,
    cancelled_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl UserSubscription {
    /// Starts a subscription. `end_date` is `start + duration_days`.
    pub(crate) fn start(
        user_id: UserId,
        plan_id: PlanId,
        plan_name: String,
        price: Money,
        start_date: Timestamp,
        duration_days: u32,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan_id,
            plan_name,
            price,
            start_date,
            end_date: start_date.add_days(duration_days as i64),
            status: SubscriptionStatus::Active,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a subscription from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SubscriptionId,
        user_id: UserId,
        plan_id: PlanId,
        plan_name: String,
        price: Money,
        start_date: Timestamp,
        end_date: Timestamp,
        status: SubscriptionStatus,
        cancelled_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            plan_id,
            plan_name,
            price,
            start_date,
            end_date,
            status,
            cancelled_at,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn plan_id(&self) -> &PlanId {
        &self.plan_id
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn start_date(&self) -> &Timestamp {
        &self.start_date
    }

    pub fn end_date(&self) -> &Timestamp {
        &self.end_date
    }

    /// Status as stored. Use [`effective_status`](Self::effective_status) for
    /// anything time-dependent.
    pub fn stored_status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn cancelled_at(&self) -> Option<&Timestamp> {
        self.cancelled_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Status as of `now`: an active subscription past its end date reads as
    /// `Expired`.
    pub fn effective_status(&self, now: &Timestamp) -> SubscriptionStatus {
        match self.status {
            SubscriptionStatus::Active if !now.is_before(&self.end_date) => {
                SubscriptionStatus::Expired
            }
            other => other,
        }
    }

    pub fn is_active_at(&self, now: &Timestamp) -> bool {
        self.effective_status(now) == SubscriptionStatus::Active
    }

    /// Cancels the subscription.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if already cancelled or expired as of `now`
    pub(crate) fn cancel(&mut self, now: Timestamp) -> Result<(), DomainError> {
        self.status = self
            .effective_status(&now)
            .transition_to(SubscriptionStatus::Cancelled, "cancel")?;
        self.cancelled_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, ErrorCode};

    fn subscription(start: Timestamp, days: u32) -> UserSubscription {
        UserSubscription::start(
            UserId::new(),
            PlanId::new(),
            "Monthly".to_string(),
            Money::new(10_000, Currency::default_currency()).unwrap(),
            start,
            days,
        )
    }

    #[test]
    fn end_date_is_start_plus_duration() {
        let start = Timestamp::now();
        let sub = subscription(start, 30);
        assert_eq!(sub.end_date().duration_since(&start).num_days(), 30);
    }

    #[test]
    fn reads_as_expired_after_end_date() {
        let start = Timestamp::now().add_days(-40);
        let sub = subscription(start, 30);

        assert_eq!(sub.stored_status(), SubscriptionStatus::Active);
        assert_eq!(sub.effective_status(&Timestamp::now()), SubscriptionStatus::Expired);
        assert!(!sub.is_active_at(&Timestamp::now()));
    }

    #[test]
    fn cancel_is_terminal() {
        let mut sub = subscription(Timestamp::now(), 30);
        sub.cancel(Timestamp::now()).unwrap();
        assert_eq!(sub.stored_status(), SubscriptionStatus::Cancelled);
        assert!(sub.cancelled_at().is_some());

        let err = sub.cancel(Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Cancelled"));
    }

    #[test]
    fn cannot_cancel_expired_subscription() {
        let mut sub = subscription(Timestamp::now().add_days(-40), 30);
        let err = sub.cancel(Timestamp::now()).unwrap_err();
        assert_eq!(err.detail("current_status"), Some("Expired"));
        assert_eq!(sub.stored_status(), SubscriptionStatus::Active);
    }
}
