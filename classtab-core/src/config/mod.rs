//! Configuration schema
//!
//! Types deserialized from `classtab` YAML configuration files. Loading and
//! validation live in the `classtab` crate.

pub mod schema;

pub use schema::*;
