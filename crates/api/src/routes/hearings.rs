//! Route definitions for the `/hearings` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::hearing;
use crate::state::AppState;

/// Routes mounted at `/hearings`.
///
/// ```text
/// GET    /                -> list_hearings
/// POST   /                -> create_hearing
/// GET    /upcoming        -> upcoming_hearings (?days=, ?lawyer_id=)
/// GET    /{id}            -> get_hearing
/// PUT    /{id}            -> update_hearing
/// DELETE /{id}            -> delete_hearing (admin or lawyer)
/// POST   /{id}/postpone   -> postpone_hearing
/// POST   /{id}/complete   -> complete_hearing
/// POST   /{id}/cancel     -> cancel_hearing
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(hearing::list_hearings).post(hearing::create_hearing))
        .route("/upcoming", get(hearing::upcoming_hearings))
        .route(
            "/{id}",
            get(hearing::get_hearing)
                .put(hearing::update_hearing)
                .delete(hearing::delete_hearing),
        )
        .route("/{id}/postpone", post(hearing::postpone_hearing))
        .route("/{id}/complete", post(hearing::complete_hearing))
        .route("/{id}/cancel", post(hearing::cancel_hearing))
}
