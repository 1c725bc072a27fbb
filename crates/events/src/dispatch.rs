//! Handler registration and per-event task dispatch.
//!
//! [`TriggerDispatcher`] consumes the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and runs every registered [`ObjectFinalizedHandler`]
//! for every event, each invocation as its own tokio task. Invocations share
//! no state and are not ordered relative to each other.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::task::{JoinError, JoinSet};

use crate::bus::ObjectFinalized;

/// A unit of work triggered by an object-finalize event.
///
/// Handlers report their own outcome through logging; nothing is returned
/// to the dispatcher and nothing is retried.
#[async_trait]
pub trait ObjectFinalizedHandler: Send + Sync {
    /// Short name used in dispatcher logs.
    fn name(&self) -> &str;

    async fn handle(&self, event: &ObjectFinalized);
}

/// Fans finalize events out to registered handlers.
#[derive(Default)]
pub struct TriggerDispatcher {
    handlers: Vec<Arc<dyn ObjectFinalizedHandler>>,
}

impl TriggerDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for every subsequent event.
    pub fn register(mut self, handler: Arc<dyn ObjectFinalizedHandler>) -> Self {
        tracing::info!(handler = handler.name(), "Registered object-finalized handler");
        self.handlers.push(handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the dispatch loop.
    ///
    /// Exits when the channel is closed (the bus is dropped), after every
    /// in-flight invocation has finished.
    pub async fn run(self, mut receiver: broadcast::Receiver<ObjectFinalized>) {
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                received = receiver.recv() => match received {
                    Ok(event) => self.dispatch(&mut in_flight, event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(
                            skipped = n,
                            "Trigger dispatcher lagged, some finalize events were dropped"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, trigger dispatcher draining");
                        break;
                    }
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    log_join(joined);
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            log_join(joined);
        }
        tracing::info!("Trigger dispatcher stopped");
    }

    fn dispatch(&self, in_flight: &mut JoinSet<()>, event: ObjectFinalized) {
        tracing::debug!(
            bucket = %event.bucket,
            object = %event.name,
            handlers = self.handlers.len(),
            "Dispatching finalize event"
        );

        let event = Arc::new(event);
        for handler in &self.handlers {
            let handler = Arc::clone(handler);
            let event = Arc::clone(&event);
            in_flight.spawn(async move {
                handler.handle(&event).await;
            });
        }
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "Object-finalized handler task failed");
    }
}
