//! Subscription plan domain module.
//!
//! Member subscriptions themselves live with the User aggregate
//! (see `domain::user::UserSubscription`).

mod plan;

pub use plan::{SubscriptionPlan, MAX_DURATION_DAYS, MAX_NAME_LENGTH};
