//! Liveness of the two things an accepted event depends on: the `bot`
//! table and a dispatcher listening on the event bus.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` only when the database answers and a dispatcher is subscribed.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Dispatchers receiving finalize events; zero means events are dropped.
    pub event_subscribers: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match videohint_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    let event_subscribers = state.event_bus.subscriber_count();

    let status = if db_healthy && event_subscribers > 0 {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        event_subscribers,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
