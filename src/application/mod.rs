//! Application layer - Request dispatch, transactions and handlers.
//!
//! Requests (commands and queries) pass the validation gate, are routed by
//! the [`Dispatcher`] to exactly one handler, and mutating handlers wrap
//! their persistence in [`in_transaction`].

pub mod dispatcher;
pub mod handlers;
pub mod policy;
pub mod transaction;
pub mod validation;
pub mod views;

pub use dispatcher::{Dispatcher, Request, RequestHandler};
pub use handlers::register_all;
pub use policy::BillingPolicy;
pub use transaction::in_transaction;
pub use validation::{ensure_valid, Rules, Validate};
