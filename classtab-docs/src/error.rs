//! Error types for `classtab` table synthesis.

use classtab_core::error::{DomError, HtmlParseError};
use thiserror::Error;

/// Errors that can occur while synthesizing summary tables.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The page could not be parsed.
    #[error(transparent)]
    Parse(#[from] HtmlParseError),

    /// A class block has no content region to insert into.
    #[error("{block} has no content region")]
    MissingContent {
        /// Description of the offending block.
        block: String,
    },

    /// A tree mutation failed.
    #[error("document error: {0}")]
    Dom(#[from] DomError),
}
