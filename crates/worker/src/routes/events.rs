//! Intake of object-finalize notifications from the storage host.
//!
//! The host's delivery and retry semantics end at this route: an accepted
//! notification is published on the event bus and the request completes
//! before any handler runs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::post, Json, Router};
use serde::Serialize;
use videohint_events::FinalizeNotification;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body returned for an accepted notification.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub bucket: String,
    pub name: String,
    /// Dispatchers that will see the event.
    pub subscribers: usize,
}

/// POST /events/object-finalized -- accepts a bare or enveloped notification.
async fn object_finalized(
    State(state): State<AppState>,
    Json(notification): Json<FinalizeNotification>,
) -> AppResult<(StatusCode, Json<AcceptedResponse>)> {
    let event = notification.into_event();

    if event.bucket.trim().is_empty() || event.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Finalize notification requires a non-empty bucket and name".into(),
        ));
    }

    let bucket = event.bucket.clone();
    let name = event.name.clone();
    let subscribers = state.event_bus.publish(event);

    if subscribers == 0 {
        tracing::warn!(bucket = %bucket, object = %name, "No dispatcher subscribed, event dropped");
    } else {
        tracing::info!(bucket = %bucket, object = %name, "Finalize event accepted");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            bucket,
            name,
            subscribers,
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/events/object-finalized", post(object_finalized))
}
