//! `classtab` - class summary tables for rendered API documentation
//!
//! Library half of the `classtab` binary: argument parsing, configuration
//! loading, page discovery and the command handlers.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod observability;
