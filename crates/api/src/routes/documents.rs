use axum::routing::get;
use axum::Router;

use crate::handlers::document;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /       -> list_documents (?entity_type=&entity_id=)
/// POST   /       -> create_document
/// GET    /{id}   -> get_document
/// PUT    /{id}   -> update_document
/// DELETE /{id}   -> delete_document (admin or lawyer)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(document::list_documents).post(document::create_document),
        )
        .route(
            "/{id}",
            get(document::get_document)
                .put(document::update_document)
                .delete(document::delete_document),
        )
}
