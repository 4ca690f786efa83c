//! Payment domain module.

mod aggregate;
mod status;

pub use aggregate::Payment;
pub use status::{PaymentMethod, PaymentStatus};
