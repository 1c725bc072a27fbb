//! The label-to-prompt pipeline step.
//!
//! [`LabelPromptHandler`] reacts to a finalized label-detection result:
//! it downloads the JSON, flattens it to CSV, wraps the CSV in a prompt,
//! and writes the prompt into the matching `bot` record so the downstream
//! text-generation consumer picks it up.

pub mod handler;
pub mod outcome;

pub use handler::LabelPromptHandler;
pub use outcome::{Outcome, PipelineError, SkipReason};
