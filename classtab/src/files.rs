//! Page discovery and output paths.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ClassTabError;

/// An HTML page found on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFile {
    /// Path to read from.
    pub path: PathBuf,
    /// Path relative to the input it was found under; used for `--output`.
    pub relative: PathBuf,
}

impl PageFile {
    /// Where the transformed page goes: in place, or mirrored under `output`.
    #[must_use]
    pub fn destination(&self, output: Option<&Path>) -> PathBuf {
        output.map_or_else(|| self.path.clone(), |dir| dir.join(&self.relative))
    }
}

/// Expands files and directories into the list of pages to process.
///
/// Directories are searched recursively for `*.html`. Explicit files are
/// taken as given, whatever their extension. Duplicates are dropped.
///
/// # Errors
///
/// Returns [`ClassTabError::MissingInput`] for a path that does not exist.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PageFile>, ClassTabError> {
    let mut pages: Vec<PageFile> = Vec::new();

    for input in inputs {
        if input.is_file() {
            let relative = input
                .file_name()
                .map_or_else(|| input.clone(), PathBuf::from);
            push_unique(&mut pages, input.clone(), relative);
        } else if input.is_dir() {
            let pattern = format!(
                "{}/**/*.html",
                glob::Pattern::escape(&input.to_string_lossy())
            );
            let before = pages.len();
            for path in glob::glob(&pattern)?.filter_map(Result::ok) {
                if !path.is_file() {
                    continue;
                }
                let relative = path
                    .strip_prefix(input)
                    .map_or_else(|_| path.clone(), Path::to_path_buf);
                push_unique(&mut pages, path, relative);
            }
            debug!(dir = %input.display(), pages = pages.len() - before, "scanned directory");
        } else {
            return Err(ClassTabError::MissingInput {
                path: input.clone(),
            });
        }
    }

    Ok(pages)
}

fn push_unique(pages: &mut Vec<PageFile>, path: PathBuf, relative: PathBuf) {
    if !pages.iter().any(|p| p.path == path) {
        pages.push(PageFile { path, relative });
    }
}
