//! Invoice handlers: issue, settle and list.

mod create_invoice;
mod get_invoice;
mod get_user_invoices;
mod mark_invoice_paid;

// Commands
pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceHandler, CreatedInvoice};
pub use mark_invoice_paid::{MarkInvoicePaidCommand, MarkInvoicePaidHandler};

// Queries
pub use get_invoice::{GetInvoiceByIdHandler, GetInvoiceByIdQuery};
pub use get_user_invoices::{GetUserInvoicesHandler, GetUserInvoicesQuery};
