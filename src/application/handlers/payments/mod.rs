//! Payment handlers: record, process, refund and history.

mod create_payment;
mod get_payment;
mod get_user_payments;
mod process_payment;
mod refund_payment;

// Commands
pub use create_payment::{CreatePaymentCommand, CreatePaymentHandler};
pub use process_payment::{ProcessPaymentCommand, ProcessPaymentHandler};
pub use refund_payment::{RefundPaymentCommand, RefundPaymentHandler};

// Queries
pub use get_payment::{GetPaymentByIdHandler, GetPaymentByIdQuery};
pub use get_user_payments::{GetUserPaymentsHandler, GetUserPaymentsQuery};
