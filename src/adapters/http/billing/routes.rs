//! Route configuration for billing endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    create_invoice, create_payment, get_invoice, get_payment, list_user_invoices,
    list_user_payments, mark_invoice_paid, process_payment, refund_payment,
};
use crate::adapters::http::AppState;

/// Payment and invoice routes, relative to `/api`.
pub fn billing_router() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/:id", get(get_payment))
        .route("/payments/:id/process", post(process_payment))
        .route("/payments/:id/refund", post(refund_payment))
        .route("/users/:id/payments", get(list_user_payments))
        .route("/invoices", post(create_invoice))
        .route("/invoices/:id", get(get_invoice))
        .route("/invoices/:id/pay", post(mark_invoice_paid))
        .route("/users/:id/invoices", get(list_user_invoices))
}
