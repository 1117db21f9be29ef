pub mod admin;
pub mod auth;
pub mod cases;
pub mod clients;
pub mod dashboard;
pub mod documents;
pub mod health;
pub mod hearings;
pub mod invoices;
pub mod lawyers;
pub mod options;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout
/// /auth/me                             current user
/// /auth/password                       change password (PUT)
/// /auth/preferences                    preferred language (PUT)
///
/// /admin/users                         list, create (admin only)
/// /admin/users/{id}                    get, update, deactivate
/// /admin/users/{id}/reset-password     reset password
///
/// /options                             all option dictionaries
/// /options/{kind}                      one dictionary
///
/// /clients                             list, create
/// /clients/{id}                        get, update, delete
/// /clients/{id}/cases                  client's cases
///
/// /lawyers                             list, create
/// /lawyers/{id}                        get, update, delete
/// /lawyers/{id}/cases                  lawyer's cases
/// /lawyers/{id}/hearings               lawyer's hearings
///
/// /cases                               list, create
/// /cases/{id}                          get, update, delete
/// /cases/{id}/status                   change status (PUT)
/// /cases/{id}/lawyers                  team list, assign
/// /cases/{id}/lawyers/{lawyer_id}      unassign
/// /cases/{id}/hearings                 case hearings
/// /cases/{id}/invoices                 case invoices
/// /cases/{id}/documents                case documents
///
/// /hearings                            list, create
/// /hearings/upcoming                   upcoming window (?days=)
/// /hearings/{id}                       get, update, delete
/// /hearings/{id}/postpone              postpone (POST)
/// /hearings/{id}/complete              complete (POST)
/// /hearings/{id}/cancel                cancel (POST)
///
/// /invoices                            list, create
/// /invoices/{id}                       get, update, delete
/// /invoices/{id}/send                  send (POST)
/// /invoices/{id}/cancel                cancel (POST)
/// /invoices/{id}/payments              list, record
///
/// /documents                           list, create
/// /documents/{id}                      get, update, delete
///
/// /dashboard/stats                     headline figures
/// /dashboard/upcoming-hearings         upcoming hearings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/options", options::router())
        .nest("/clients", clients::router())
        .nest("/lawyers", lawyers::router())
        .nest("/cases", cases::router())
        .nest("/hearings", hearings::router())
        .nest("/invoices", invoices::router())
        .nest("/documents", documents::router())
        .nest("/dashboard", dashboard::router())
}
