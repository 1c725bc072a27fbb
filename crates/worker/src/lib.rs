//! `videohint-worker` library crate.
//!
//! Configuration, HTTP intake of object-finalize notifications, and router
//! construction. The binary entrypoint lives in `main.rs`.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
