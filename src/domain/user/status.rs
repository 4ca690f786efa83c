//! User and subscription status state machines.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Account status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Member may use the club and subscribe to plans.
    Active,

    /// Soft-deleted account. Kept for history, can be reactivated.
    Inactive,

    /// Temporarily barred, e.g. for unpaid dues.
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        }
    }

    /// Parses the stored representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            "suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

impl StateMachine for UserStatus {
    const AGGREGATE: &'static str = "User";

    fn can_transition_to(&self, target: &Self) -> bool {
        use UserStatus::*;
        matches!(
            (self, target),
            (Active, Inactive)
                | (Active, Suspended)
                | (Suspended, Active)
                | (Suspended, Inactive)
                | (Inactive, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use UserStatus::*;
        match self {
            Active => vec![Inactive, Suspended],
            Suspended => vec![Active, Inactive],
            Inactive => vec![Active],
        }
    }
}

/// Lifecycle of a member's subscription to a plan.
///
/// `Expired` is never stored by a transition on the aggregate. It is derived
/// when reading an `Active` subscription whose end date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(SubscriptionStatus::Active),
            "cancelled" => Some(SubscriptionStatus::Cancelled),
            "expired" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    const AGGREGATE: &'static str = "UserSubscription";

    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!((self, target), (Active, Cancelled) | (Active, Expired))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Active => vec![Cancelled, Expired],
            Cancelled | Expired => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_can_be_suspended_only_from_active() {
        assert!(UserStatus::Active.can_transition_to(&UserStatus::Suspended));
        assert!(!UserStatus::Inactive.can_transition_to(&UserStatus::Suspended));
        assert!(!UserStatus::Suspended.can_transition_to(&UserStatus::Suspended));
    }

    #[test]
    fn user_status_has_no_terminal_state() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended] {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn cancelled_subscription_is_terminal() {
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(!SubscriptionStatus::Cancelled.can_transition_to(&SubscriptionStatus::Active));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubscriptionStatus::parse("cancelled"), Some(SubscriptionStatus::Cancelled));
        assert_eq!(SubscriptionStatus::parse("paused"), None);
    }

    #[test]
    fn transition_tables_are_consistent() {
        for status in [UserStatus::Active, UserStatus::Inactive, UserStatus::Suspended] {
            for target in status.valid_transitions() {
                assert!(status.can_transition_to(&target));
            }
        }
    }
}
