//! Route definitions for the `/lawyers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::lawyer;
use crate::state::AppState;

/// Routes mounted at `/lawyers`.
///
/// Writes require the `admin` role.
///
/// ```text
/// GET    /               -> list_lawyers
/// POST   /               -> create_lawyer
/// GET    /{id}           -> get_lawyer
/// PUT    /{id}           -> update_lawyer
/// DELETE /{id}           -> delete_lawyer
/// GET    /{id}/cases     -> list_lawyer_cases
/// GET    /{id}/hearings  -> list_lawyer_hearings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lawyer::list_lawyers).post(lawyer::create_lawyer))
        .route(
            "/{id}",
            get(lawyer::get_lawyer)
                .put(lawyer::update_lawyer)
                .delete(lawyer::delete_lawyer),
        )
        .route("/{id}/cases", get(lawyer::list_lawyer_cases))
        .route("/{id}/hearings", get(lawyer::list_lawyer_hearings))
}
