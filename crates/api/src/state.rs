use std::sync::Arc;

use leanline_db::Store;

use crate::ai::CompletionProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend (PostgreSQL or in-memory).
    pub store: Arc<dyn Store>,
    /// Server configuration (session secret, demo credentials, AI settings).
    pub config: Arc<ServerConfig>,
    /// Chat-completion service used by the AI endpoints.
    pub ai: Arc<dyn CompletionProvider>,
}
