use std::sync::Arc;

use agenda_db::store::UserStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Credential store (PostgreSQL in production, in-memory in tests).
    pub users: Arc<dyn UserStore>,
    /// Server configuration, read by extractors and handlers.
    pub config: Arc<ServerConfig>,
}
