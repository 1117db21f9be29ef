use axum::routing::get;
use axum::Router;

use crate::handlers::options;
use crate::state::AppState;

/// Routes mounted at `/options`.
///
/// ```text
/// GET /         -> all_options
/// GET /{kind}   -> option_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(options::all_options))
        .route("/{kind}", get(options::option_list))
}
