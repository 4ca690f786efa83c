//! User domain module.
//!
//! Members, their personal/contact details and the subscriptions they hold.

mod aggregate;
mod status;
mod subscription;
mod values;

pub use aggregate::User;
pub use status::{SubscriptionStatus, UserStatus};
pub use subscription::UserSubscription;
pub use values::{
    normalize_email, normalize_language, ContactInfo, Gender, MembershipNumber, PersonalInfo,
    DEFAULT_LANGUAGE, MAX_NAME_LENGTH, MINIMUM_AGE_YEARS,
};
