//! Core error types for `classtab`
//!
//! Document-tree and HTML parsing errors shared across the workspace.

use thiserror::Error;

// ============================================================================
// HTML Parse Errors
// ============================================================================

/// Failure while parsing an HTML page into a [`crate::dom::Document`].
///
/// The parser is tolerant of sloppy markup (stray end tags, implicitly
/// closed elements); these errors are reserved for input that cannot be
/// tokenized at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("html parse error at byte {offset}: {message}")]
pub struct HtmlParseError {
    /// Byte offset into the source where the problem was found.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl HtmlParseError {
    /// Creates a parse error at `offset`.
    #[must_use]
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

// ============================================================================
// Document Errors
// ============================================================================

/// Errors raised by structural mutations of a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// A node id does not belong to this document.
    #[error("node {0} does not exist")]
    InvalidNode(usize),

    /// The target node cannot hold children (text, comment, doctype).
    #[error("node {0} cannot have children")]
    NotAContainer(usize),

    /// The reference node passed to `insert_before` is not a child of the parent.
    #[error("node {reference} is not a child of node {parent}")]
    NotAChild {
        /// Intended parent.
        parent: usize,
        /// Reference child.
        reference: usize,
    },

    /// The mutation would make a node its own ancestor.
    #[error("inserting node {0} here would create a cycle")]
    Cycle(usize),
}
