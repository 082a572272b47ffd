//! Observability module
//!
//! Structured logging for `classtab` runs.

pub mod logging;

pub use logging::{LogFormat, init_logging};
