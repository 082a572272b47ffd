//! `classtab` Core - document model and shared types
//!
//! This crate provides the HTML document tree, the page model traits and the
//! configuration schema shared across `classtab` (CLI) and `classtab-docs`
//! (table synthesis).

pub mod config;
pub mod dom;
pub mod error;
pub mod model;
