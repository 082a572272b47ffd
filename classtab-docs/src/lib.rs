//! `classtab` Docs - summary table synthesis
//!
//! Builds a properties / attributes / methods overview table for every class
//! block of a rendered API documentation page and inserts it above the
//! detailed member documentation.

pub mod error;
pub mod html;
pub mod synthesize;
pub mod table;

pub use error::SynthError;
pub use html::HtmlPage;
pub use synthesize::{SynthesisReport, synthesize_page, transform_html};
