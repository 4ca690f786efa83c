//! Member handlers.
//!
//! ## Commands
//! - Registering and updating members
//! - Deactivating, suspending and reactivating accounts
//! - Subscribing to and cancelling plans
//!
//! ## Queries
//! - Member by id, paged member listing, subscription history

mod cancel_subscription;
mod change_status;
mod create_user;
mod get_user;
mod get_user_subscriptions;
mod get_users;
mod subscribe_to_plan;
mod update_user;

// Commands
pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use change_status::{
    ChangeUserStatusHandler, DeactivateUserCommand, ReactivateUserCommand, SuspendUserCommand,
};
pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use subscribe_to_plan::{SubscribeToPlanCommand, SubscribeToPlanHandler};
pub use update_user::{UpdateUserCommand, UpdateUserHandler};

// Queries
pub use get_user::{GetUserByIdHandler, GetUserByIdQuery};
pub use get_user_subscriptions::{GetUserSubscriptionsHandler, GetUserSubscriptionsQuery};
pub use get_users::{GetUsersHandler, GetUsersQuery};
