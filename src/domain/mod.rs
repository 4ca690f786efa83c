//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, money, errors, state machine)
//! - `user` - Members, their details and subscriptions
//! - `subscription` - Subscription plans offered by the club
//! - `trainer` - Trainers referenced by workout sessions
//! - `workout` - Workout session lifecycle
//! - `attendance` - Check-in/check-out records
//! - `payment` - Payment lifecycle
//! - `invoice` - Billing records

pub mod attendance;
pub mod foundation;
pub mod invoice;
pub mod payment;
pub mod subscription;
pub mod trainer;
pub mod user;
pub mod workout;
