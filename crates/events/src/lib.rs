//! Object-finalize event intake and handler dispatch.
//!
//! - [`ObjectFinalized`]: the event raised when an object write completes.
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ObjectFinalizedHandler`] / [`TriggerDispatcher`]: handlers registered
//!   against the bus, each event run as its own task.

pub mod bus;
pub mod dispatch;

pub use bus::{EventBus, FinalizeNotification, ObjectFinalized};
pub use dispatch::{ObjectFinalizedHandler, TriggerDispatcher};
