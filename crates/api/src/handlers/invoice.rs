//! Handlers for the `/invoices` resource: drafts, sending, cancelling and
//! payments.
//!
//! Totals are always computed here from the submitted lines; clients never
//! send subtotal, tax or total. Statuses are presented with `overdue`
//! derived from the due date.

use adala_core::billing::{self, InvoiceTotals};
use adala_core::error::CoreError;
use adala_core::options::{ensure_valid, OptionKind};
use adala_core::pagination::Page;
use adala_core::types::{Date, DbId, Minor};
use adala_db::models::invoice::{
    CreateInvoice, CreatePayment, Invoice, InvoiceHeader, InvoiceItem, InvoiceItemInput,
    InvoiceListItem, InvoiceQuery, NewInvoiceItem, Payment, UpdateInvoice,
};
use adala_db::repositories::{CaseRepo, ClientRepo, InvoiceRepo};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use validator::Validate;

use super::{missing_reference, today};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

pub const DEFAULT_CURRENCY: &str = "SAR";

/// Saudi VAT, applied when a new invoice names no rate.
pub const DEFAULT_TAX_RATE_BPS: i32 = 1_500;

/// An invoice with its lines, payments and outstanding balance.
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: InvoiceListItem,
    pub balance_minor: Minor,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<Payment>,
}

/// Result of recording a payment.
#[derive(Debug, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub invoice: Invoice,
    pub balance_minor: Minor,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Invoice",
        id,
    })
}

/// Price each submitted line.
fn price_items(items: &[InvoiceItemInput]) -> AppResult<Vec<NewInvoiceItem>> {
    items
        .iter()
        .map(|item| {
            let line_total_minor = billing::line_total(item.quantity, item.unit_price_minor)?;
            Ok(NewInvoiceItem {
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price_minor: item.unit_price_minor,
                line_total_minor,
            })
        })
        .collect()
}

fn normalize_currency(currency: &str) -> AppResult<String> {
    let code = currency.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Core(CoreError::Validation(
            "Currency must be a 3-letter code".into(),
        )));
    }
    Ok(code)
}

/// The client must exist and, when a case is named, own it.
async fn check_parties(state: &AppState, client_id: DbId, case_id: Option<DbId>) -> AppResult<()> {
    if !ClientRepo::exists(&state.pool, client_id).await? {
        return Err(missing_reference("Client", client_id));
    }
    if let Some(case_id) = case_id {
        let case = CaseRepo::find_by_id(&state.pool, case_id)
            .await?
            .ok_or_else(|| missing_reference("Case", case_id))?;
        if case.client_id != client_id {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Case {} does not belong to client {client_id}",
                case.case_number
            ))));
        }
    }
    Ok(())
}

async fn load_detail(state: &AppState, id: DbId, day: Date) -> AppResult<InvoiceDetail> {
    let mut invoice = InvoiceRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    invoice.invoice = invoice.invoice.present(day);
    let items = InvoiceRepo::list_items(&state.pool, id).await?;
    let payments = InvoiceRepo::list_payments(&state.pool, id).await?;
    Ok(InvoiceDetail {
        balance_minor: invoice.invoice.balance_minor(),
        invoice,
        items,
        payments,
    })
}

/// POST /api/v1/invoices
///
/// Creates a draft. The number (`INV-<year>-<seq>`) follows the issue year.
pub async fn create_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<InvoiceDetail>>)> {
    input.validate()?;
    check_parties(&state, input.client_id, input.case_id).await?;

    let day = today();
    let issue_date = input.issue_date.unwrap_or(day);
    billing::check_dates(issue_date, input.due_date)?;

    let items = price_items(&input.items)?;
    let line_totals: Vec<Minor> = items.iter().map(|i| i.line_total_minor).collect();
    let tax_rate_bps = input.tax_rate_bps.unwrap_or(DEFAULT_TAX_RATE_BPS);
    let totals: InvoiceTotals =
        billing::compute_totals(&line_totals, input.discount_minor.unwrap_or(0), tax_rate_bps)?;

    let header = InvoiceHeader {
        client_id: input.client_id,
        case_id: input.case_id,
        issue_date,
        due_date: input.due_date,
        currency: normalize_currency(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))?,
        tax_rate_bps,
        notes: input.notes,
    };

    let invoice =
        InvoiceRepo::create(&state.pool, &header, &items, &totals, Some(auth.user_id)).await?;
    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        total_minor = invoice.total_minor,
        user_id = auth.user_id,
        "Invoice created"
    );

    let detail = load_detail(&state, invoice.id, day).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/invoices
pub async fn list_invoices(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<InvoiceQuery>,
) -> AppResult<Json<PaginatedResponse<InvoiceListItem>>> {
    if let Some(status) = params.status.as_deref() {
        ensure_valid(OptionKind::InvoiceStatuses, "status", status.trim())?;
    }
    let page = Page::from_params(params.page, params.per_page);
    let day = today();
    let invoices = InvoiceRepo::list(&state.pool, &params, page)
        .await?
        .into_iter()
        .map(|mut item| {
            item.invoice = item.invoice.present(day);
            item
        })
        .collect();
    let total = InvoiceRepo::count(&state.pool, &params).await?;
    Ok(Json(PaginatedResponse::new(invoices, page, total)))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    let detail = load_detail(&state, id, today()).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/invoices/{id}
///
/// Drafts only. Omitted fields keep their stored value; `items`, when
/// present, replaces every line.
pub async fn update_invoice(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    input.validate()?;

    let current = InvoiceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    billing::check_editable(&current.status)?;

    let case_id = input.case_id.or(current.case_id);
    check_parties(&state, current.client_id, case_id).await?;

    let header = InvoiceHeader {
        client_id: current.client_id,
        case_id,
        issue_date: input.issue_date.unwrap_or(current.issue_date),
        due_date: input.due_date.unwrap_or(current.due_date),
        currency: match input.currency.as_deref() {
            Some(code) => normalize_currency(code)?,
            None => current.currency.clone(),
        },
        tax_rate_bps: input.tax_rate_bps.unwrap_or(current.tax_rate_bps),
        notes: input.notes.or(current.notes),
    };
    billing::check_dates(header.issue_date, header.due_date)?;

    let items = input.items.as_deref().map(price_items).transpose()?;
    let discount_minor = input.discount_minor.unwrap_or(current.discount_minor);

    InvoiceRepo::update(&state.pool, id, &header, discount_minor, items.as_deref())
        .await?
        .ok_or_else(|| not_found(id))?;

    let detail = load_detail(&state, id, today()).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/invoices/{id}
///
/// Refused once any payment has been recorded.
pub async fn delete_invoice(
    State(state): State<AppState>,
    RequireManager(user): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !InvoiceRepo::soft_delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(invoice_id = id, user_id = user.user_id, "Invoice deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/invoices/{id}/send
pub async fn send_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    InvoiceRepo::send(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(invoice_id = id, user_id = auth.user_id, "Invoice sent");
    let detail = load_detail(&state, id, today()).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/invoices/{id}/cancel
pub async fn cancel_invoice(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvoiceDetail>>> {
    InvoiceRepo::cancel(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(invoice_id = id, user_id = auth.user_id, "Invoice cancelled");
    let detail = load_detail(&state, id, today()).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/invoices/{id}/payments
pub async fn list_payments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    if !InvoiceRepo::exists(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let payments = InvoiceRepo::list_payments(&state.pool, id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// POST /api/v1/invoices/{id}/payments
///
/// The invoice row is locked while the payment is applied, so concurrent
/// payments cannot exceed the balance.
pub async fn record_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentReceipt>>)> {
    input.validate()?;
    ensure_valid(OptionKind::PaymentMethods, "method", &input.method)?;

    let day = today();
    let paid_on = input.paid_on.unwrap_or(day);
    if paid_on > day {
        return Err(AppError::Core(CoreError::Validation(
            "Payment date cannot be in the future".into(),
        )));
    }

    let (invoice, payment) =
        InvoiceRepo::record_payment(&state.pool, id, &input, paid_on, Some(auth.user_id))
            .await?
            .ok_or_else(|| not_found(id))?;
    tracing::info!(
        invoice_id = id,
        payment_id = payment.id,
        amount_minor = payment.amount_minor,
        status = %invoice.status,
        user_id = auth.user_id,
        "Payment recorded"
    );

    let invoice = invoice.present(day);
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PaymentReceipt {
                balance_minor: invoice.balance_minor(),
                payment,
                invoice,
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: f64, unit_price_minor: Minor) -> InvoiceItemInput {
        InvoiceItemInput {
            description: "Consultation".into(),
            quantity,
            unit_price_minor,
        }
    }

    #[test]
    fn lines_are_priced() {
        let items = price_items(&[line(2.0, 50_000), line(0.5, 33_333)]).unwrap();
        assert_eq!(items[0].line_total_minor, 100_000);
        assert_eq!(items[1].line_total_minor, 16_667);
    }

    #[test]
    fn bad_lines_are_rejected() {
        assert!(price_items(&[line(0.0, 100)]).is_err());
        assert!(price_items(&[line(1.0, -5)]).is_err());
    }

    #[test]
    fn currency_codes_are_normalized() {
        assert_eq!(normalize_currency(" usd ").unwrap(), "USD");
        assert!(normalize_currency("US").is_err());
        assert!(normalize_currency("U5D").is_err());
    }
}
