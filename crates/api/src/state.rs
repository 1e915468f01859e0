use std::sync::Arc;

use barter_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: barter_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Marketplace events are published here after their transaction commits.
    pub event_bus: Arc<EventBus>,
}
