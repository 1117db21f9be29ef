//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login        -> login
/// POST /refresh      -> refresh
/// POST /logout       -> logout (requires auth)
/// GET  /me           -> me
/// PUT  /password     -> change_password
/// PUT  /preferences  -> update_preferences
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/password", put(auth::change_password))
        .route("/preferences", put(auth::update_preferences))
}
