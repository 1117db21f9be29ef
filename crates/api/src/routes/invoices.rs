//! Route definitions for the `/invoices` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::invoice;
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /                -> list_invoices
/// POST   /                -> create_invoice
/// GET    /{id}            -> get_invoice (items and payments)
/// PUT    /{id}            -> update_invoice (drafts only)
/// DELETE /{id}            -> delete_invoice (admin or lawyer)
/// POST   /{id}/send       -> send_invoice
/// POST   /{id}/cancel     -> cancel_invoice
/// GET    /{id}/payments   -> list_payments
/// POST   /{id}/payments   -> record_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list_invoices).post(invoice::create_invoice))
        .route(
            "/{id}",
            get(invoice::get_invoice)
                .put(invoice::update_invoice)
                .delete(invoice::delete_invoice),
        )
        .route("/{id}/send", post(invoice::send_invoice))
        .route("/{id}/cancel", post(invoice::cancel_invoice))
        .route(
            "/{id}/payments",
            get(invoice::list_payments).post(invoice::record_payment),
        )
}
