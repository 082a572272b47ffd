//! Error types for `classtab`
//!
//! Aggregates configuration, I/O and synthesis failures and maps each one to
//! a process exit code.

use std::path::PathBuf;

use classtab_docs::SynthError;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `classtab` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// A page could not be parsed as HTML
    pub const PARSE_ERROR: i32 = 4;

    /// Strict mode found skipped members or failed blocks
    pub const STRICT_FAILURE: i32 = 5;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `classtab` operations.
#[derive(Debug, Error)]
pub enum ClassTabError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An input path does not exist
    #[error("no such file or directory: {path}")]
    MissingInput {
        /// The path given on the command line
        path: PathBuf,
    },

    /// Reading a page failed
    #[error("cannot read {path}: {source}")]
    Read {
        /// Page path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Writing a page failed
    #[error("cannot write {path}: {source}")]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A page could not be processed
    #[error("{path}: {source}")]
    Page {
        /// Page path
        path: PathBuf,
        /// Underlying error
        source: SynthError,
    },

    /// Some pages failed during a multi-page run
    #[error("{failed} of {total} pages could not be processed")]
    PagesFailed {
        /// Number of failed pages
        failed: usize,
        /// Number of pages attempted
        total: usize,
        /// Exit code of the first failure
        code: i32,
    },

    /// Strict mode rejected the run
    #[error("strict mode: {skipped_members} skipped members, {failed_blocks} failed class blocks")]
    Strict {
        /// Members left out of their tables
        skipped_members: usize,
        /// Blocks whose table could not be inserted
        failed_blocks: usize,
    },

    /// Invalid glob pattern built from an input path
    #[error("invalid input path: {0}")]
    Pattern(#[from] glob::PatternError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClassTabError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::MissingInput { .. } | Self::Read { .. } | Self::Write { .. } | Self::Io(_) => {
                ExitCode::IO_ERROR
            }
            Self::Page { .. } => ExitCode::PARSE_ERROR,
            Self::PagesFailed { code, .. } => *code,
            Self::Strict { .. } => ExitCode::STRICT_FAILURE,
            Self::Pattern(_) => ExitCode::USAGE_ERROR,
            Self::Json(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the configuration file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration file not found or unreadable
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Configuration file exceeds the size limit
    #[error("{path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the configuration file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `classtab` operations.
pub type Result<T> = std::result::Result<T, ClassTabError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use classtab_core::error::HtmlParseError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::ERROR, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::PARSE_ERROR, 4);
        assert_eq!(ExitCode::STRICT_FAILURE, 5);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_config_error_exit_code() {
        let err: ClassTabError = ConfigError::MissingFile {
            path: PathBuf::from("classtab.yaml"),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_page_error_exit_code() {
        let err = ClassTabError::Page {
            path: PathBuf::from("api.html"),
            source: HtmlParseError::new(0, "unclosed tag").into(),
        };
        assert_eq!(err.exit_code(), ExitCode::PARSE_ERROR);
        assert_eq!(
            err.to_string(),
            "api.html: html parse error at byte 0: unclosed tag"
        );
    }

    #[test]
    fn test_pages_failed_carries_code() {
        let err = ClassTabError::PagesFailed {
            failed: 1,
            total: 3,
            code: ExitCode::IO_ERROR,
        };
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
        assert_eq!(err.to_string(), "1 of 3 pages could not be processed");
    }

    #[test]
    fn test_strict_exit_code() {
        let err = ClassTabError::Strict {
            skipped_members: 2,
            failed_blocks: 0,
        };
        assert_eq!(err.exit_code(), ExitCode::STRICT_FAILURE);
    }

    #[test]
    fn test_io_error_exit_code() {
        let err: ClassTabError = std::io::Error::other("boom").into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "markers.detail".to_string(),
            value: "a b".to_string(),
            expected: "a single class name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for 'markers.detail': got 'a b', expected a single class name"
        );
    }
}
