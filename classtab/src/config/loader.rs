//! Configuration loader
//!
//! 1. Size check against `CLASSTAB_MAX_CONFIG_SIZE`
//! 2. Read and strip a UTF-8 BOM
//! 3. YAML parsing into [`SynthConfig`]
//! 4. Marker validation

use std::path::Path;

use classtab_core::config::SynthConfig;
use tracing::debug;

use crate::error::ConfigError;

// ============================================================================
// Limits
// ============================================================================

/// Size limits for configuration files and input pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: u64,

    /// Pages larger than this many bytes are skipped.
    pub max_page_size: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("CLASSTAB_MAX_CONFIG_SIZE", 1024 * 1024),
            max_page_size: env_or("CLASSTAB_MAX_PAGE_SIZE", 64 * 1024 * 1024),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Loads the configuration at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file exceeds `limits.max_config_size`
/// - YAML parsing fails
/// - A marker is empty or is not a single class name
pub fn load_config(path: Option<&Path>, limits: &Limits) -> Result<SynthConfig, ConfigError> {
    let Some(path) = path else {
        debug!("no configuration file, using defaults");
        return Ok(SynthConfig::default());
    };

    let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;
    if metadata.len() > limits.max_config_size {
        return Err(ConfigError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: limits.max_config_size,
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
        path: path.to_path_buf(),
    })?;

    let config = parse_config(&raw, path)?;
    validate(&config)?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Parses YAML configuration text. An empty document yields the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] with the failing line when available.
pub fn parse_config(text: &str, path: &Path) -> Result<SynthConfig, ConfigError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let parse_error = |e: serde_yaml::Error| ConfigError::ParseError {
        path: path.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    };

    let root: serde_yaml::Value = serde_yaml::from_str(text).map_err(parse_error)?;
    if root.is_null() {
        return Ok(SynthConfig::default());
    }
    serde_yaml::from_str(text).map_err(parse_error)
}

/// Checks that every marker is a single, non-empty class name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the first bad marker.
pub fn validate(config: &SynthConfig) -> Result<(), ConfigError> {
    for (name, value) in config.markers.fields() {
        let bad = value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '.');
        if bad {
            return Err(ConfigError::InvalidValue {
                field: format!("markers.{name}"),
                value: value.to_string(),
                expected: "a single class name".to_string(),
            });
        }
    }
    Ok(())
}

/// Reads a value from the environment, falling back to `default` when the
/// variable is unset or unparsable.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
