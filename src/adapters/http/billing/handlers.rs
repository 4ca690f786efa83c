//! HTTP handlers for billing endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::invoices::{
    CreateInvoiceCommand, GetInvoiceByIdQuery, GetUserInvoicesQuery, MarkInvoicePaidCommand,
};
use crate::application::handlers::payments::{
    CreatePaymentCommand, GetPaymentByIdQuery, GetUserPaymentsQuery, ProcessPaymentCommand,
    RefundPaymentCommand,
};
use crate::domain::foundation::{InvoiceId, PaymentId, UserId};

use super::dto::{
    CreateInvoiceRequest, CreatePaymentRequest, ListInvoicesParams, ListPaymentsParams,
    MarkPaidRequest, ProcessPaymentRequest, RefundPaymentRequest,
};
use crate::adapters::http::error::{parse_id, ApiError};
use crate::adapters::http::{AppState, IdResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/payments
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .dispatcher
        .send(CreatePaymentCommand::from(request))
        .await?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// GET /api/payments/:id
pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = parse_id(&payment_id, "payment_id")?;
    let payment = state.dispatcher.send(GetPaymentByIdQuery { payment_id }).await?;
    Ok(Json(payment))
}

/// POST /api/payments/:id/process
pub async fn process_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(request): Json<ProcessPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = parse_id(&payment_id, "payment_id")?;
    let cmd = ProcessPaymentCommand {
        payment_id,
        transaction_id: request.transaction_id,
    };
    state.dispatcher.send(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/payments/:id/refund
pub async fn refund_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(request): Json<RefundPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_id: PaymentId = parse_id(&payment_id, "payment_id")?;
    let cmd = RefundPaymentCommand {
        payment_id,
        reason: request.reason,
    };
    state.dispatcher.send(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/:id/payments
pub async fn list_user_payments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<ListPaymentsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let query = GetUserPaymentsQuery {
        user_id,
        status: params.status,
        page: params.page,
        page_size: params.page_size,
    };
    Ok(Json(state.dispatcher.send(query).await?))
}

// ════════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/invoices
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = state
        .dispatcher
        .send(CreateInvoiceCommand::from(request))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/invoices/:id
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice_id: InvoiceId = parse_id(&invoice_id, "invoice_id")?;
    let invoice = state.dispatcher.send(GetInvoiceByIdQuery { invoice_id }).await?;
    Ok(Json(invoice))
}

/// POST /api/invoices/:id/pay
pub async fn mark_invoice_paid(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
    request: Option<Json<MarkPaidRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let invoice_id: InvoiceId = parse_id(&invoice_id, "invoice_id")?;
    let paid_at = request.and_then(|Json(r)| r.paid_at);
    state
        .dispatcher
        .send(MarkInvoicePaidCommand { invoice_id, paid_at })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users/:id/invoices
pub async fn list_user_invoices(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<ListInvoicesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id: UserId = parse_id(&user_id, "user_id")?;
    let query = GetUserInvoicesQuery {
        user_id,
        status: params.status,
        page: params.page,
        page_size: params.page_size,
    };
    Ok(Json(state.dispatcher.send(query).await?))
}
