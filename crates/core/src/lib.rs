//! Domain logic for the video-hint pipeline.
//!
//! Everything in this crate is free of I/O: the label-detection schema and
//! its CSV flattening, prompt synthesis, source-path derivation, and the
//! storage / record-store traits that the outer crates implement.

pub mod error;
pub mod labels;
pub mod paths;
pub mod prompt;
pub mod records;
pub mod storage;
pub mod types;
