use std::sync::Arc;

use videohint_events::EventBus;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and the bus are both reference-counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health reporting).
    pub pool: videohint_db::DbPool,
    /// Bus that carries accepted finalize events to the trigger dispatcher.
    pub event_bus: Arc<EventBus>,
}
