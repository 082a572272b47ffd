//! Configuration loading for `classtab`
//!
//! The schema lives in `classtab_core::config`; this module reads it from
//! YAML, enforces size limits and validates marker names.

pub mod loader;

pub use classtab_core::config::{Labels, Markers, SynthConfig};
pub use loader::{Limits, load_config, parse_config, validate};
