//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the hub every finalize notification passes through on its
//! way to the registered handlers. Share it via `Arc<EventBus>`.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// ObjectFinalized
// ---------------------------------------------------------------------------

/// An object write to storage has completed and the object is readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectFinalized {
    pub bucket: String,

    /// Full object path inside the bucket.
    pub name: String,

    #[serde(default, alias = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Object size in bytes, as the decimal string storage notifications carry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ObjectFinalized {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
            content_type: None,
            size: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Wire form of a finalize notification: either the bare object metadata or
/// a CloudEvents-style envelope carrying it under `data`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FinalizeNotification {
    Envelope { data: ObjectFinalized },
    Bare(ObjectFinalized),
}

impl FinalizeNotification {
    pub fn into_event(self) -> ObjectFinalized {
        match self {
            Self::Envelope { data } => data,
            Self::Bare(event) => event,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`ObjectFinalized`] event.
pub struct EventBus {
    sender: broadcast::Sender<ObjectFinalized>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Returns the number of subscribers that will see it. With no
    /// subscribers the event is dropped.
    pub fn publish(&self, event: ObjectFinalized) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Receivers currently subscribed. Zero means published events are lost.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ObjectFinalized> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
