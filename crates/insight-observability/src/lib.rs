//! # insight-observability
//!
//! Structured logging for the clustering pipeline and scheduler:
//! subscriber setup, span macros, and one event function per notable operation.

pub mod tracing_setup;

pub use tracing_setup::{events, init_from_config, init_tracing, init_tracing_with_filter};
