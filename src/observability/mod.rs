//! Observability module
//!
//! Structured logging setup for CLI runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
