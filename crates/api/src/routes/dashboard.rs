use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /stats               -> stats
/// GET /upcoming-hearings   -> upcoming_hearings
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/upcoming-hearings", get(dashboard::upcoming_hearings))
}
