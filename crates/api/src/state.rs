use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared state handed to every handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub pool: adala_db::DbPool,
    pub config: Arc<ServerConfig>,
}
