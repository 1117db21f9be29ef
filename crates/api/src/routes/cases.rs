//! Route definitions for the `/cases` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::case;
use crate::state::AppState;

/// Routes mounted at `/cases`.
///
/// ```text
/// GET    /                         -> list_cases
/// POST   /                         -> create_case
/// GET    /{id}                     -> get_case
/// PUT    /{id}                     -> update_case
/// DELETE /{id}                     -> delete_case (admin or lawyer)
/// PUT    /{id}/status              -> change_status
/// GET    /{id}/lawyers             -> list_team
/// POST   /{id}/lawyers             -> assign_lawyer
/// DELETE /{id}/lawyers/{lawyer_id} -> unassign_lawyer
/// GET    /{id}/hearings            -> list_case_hearings
/// GET    /{id}/invoices            -> list_case_invoices
/// GET    /{id}/documents           -> list_case_documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(case::list_cases).post(case::create_case))
        .route(
            "/{id}",
            get(case::get_case)
                .put(case::update_case)
                .delete(case::delete_case),
        )
        .route("/{id}/status", put(case::change_status))
        .route(
            "/{id}/lawyers",
            get(case::list_team).post(case::assign_lawyer),
        )
        .route("/{id}/lawyers/{lawyer_id}", delete(case::unassign_lawyer))
        .route("/{id}/hearings", get(case::list_case_hearings))
        .route("/{id}/invoices", get(case::list_case_invoices))
        .route("/{id}/documents", get(case::list_case_documents))
}
