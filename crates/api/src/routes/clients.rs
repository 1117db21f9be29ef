//! Route definitions for the `/clients` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::client;
use crate::state::AppState;

/// Routes mounted at `/clients`.
///
/// ```text
/// GET    /             -> list_clients
/// POST   /             -> create_client
/// GET    /{id}         -> get_client
/// PUT    /{id}         -> update_client
/// DELETE /{id}         -> delete_client (admin or lawyer)
/// GET    /{id}/cases   -> list_client_cases
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(client::list_clients).post(client::create_client))
        .route(
            "/{id}",
            get(client::get_client)
                .put(client::update_client)
                .delete(client::delete_client),
        )
        .route("/{id}/cases", get(client::list_client_cases))
}
