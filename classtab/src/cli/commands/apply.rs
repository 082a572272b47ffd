//! `apply` command: insert summary tables into HTML pages.
//!
//! Pages are processed one at a time. A page that cannot be read, parsed or
//! written is reported and skipped; the run still exits non-zero at the end.

use std::path::{Path, PathBuf};

use classtab_core::config::SynthConfig;
use classtab_docs::synthesize::{BlockOutcome, BlockReport, SkippedMember, transform_html};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{ApplyArgs, OutputFormat};
use crate::config::{Limits, load_config};
use crate::error::ClassTabError;
use crate::files::{self, PageFile};

// ============================================================================
// Results
// ============================================================================

/// What happened to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// At least one table was inserted.
    Updated,
    /// Nothing to insert.
    Unchanged,
    /// Larger than `CLASSTAB_MAX_PAGE_SIZE`; not read.
    TooLarge,
    /// Could not be read, parsed or written.
    Failed,
}

/// Outcome for one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// Page path.
    pub path: PathBuf,
    /// Status.
    pub status: PageStatus,
    /// Tables inserted.
    pub tables_inserted: usize,
    /// Failure message for [`PageStatus::Failed`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Per-block statistics.
    pub blocks: Vec<BlockReport>,
    /// Members left out of their tables.
    pub skipped_members: Vec<SkippedMember>,
}

impl PageResult {
    fn without_content(path: PathBuf, status: PageStatus, error: Option<String>) -> Self {
        Self {
            path,
            status,
            tables_inserted: 0,
            error,
            blocks: Vec::new(),
            skipped_members: Vec::new(),
        }
    }

    fn failed_blocks(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b.outcome, BlockOutcome::Failed(_)))
            .count()
    }
}

/// Totals over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    /// Pages attempted.
    pub pages: usize,
    /// Pages that received at least one table.
    pub updated: usize,
    /// Tables inserted.
    pub tables_inserted: usize,
    /// Members left out of their tables.
    pub skipped_members: usize,
    /// Blocks whose table could not be inserted.
    pub failed_blocks: usize,
    /// Pages skipped for size.
    pub too_large: usize,
    /// Pages that failed.
    pub failed_pages: usize,
}

impl ApplySummary {
    /// Sums up the per-page results.
    #[must_use]
    pub fn from_results(results: &[PageResult]) -> Self {
        let mut summary = Self {
            pages: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.status {
                PageStatus::Updated => summary.updated += 1,
                PageStatus::TooLarge => summary.too_large += 1,
                PageStatus::Failed => summary.failed_pages += 1,
                PageStatus::Unchanged => {}
            }
            summary.tables_inserted += result.tables_inserted;
            summary.skipped_members += result.skipped_members.len();
            summary.failed_blocks += result.failed_blocks();
        }
        summary
    }
}

#[derive(Serialize)]
struct ApplyReport<'a> {
    dry_run: bool,
    summary: &'a ApplySummary,
    pages: &'a [PageResult],
}

// ============================================================================
// Command
// ============================================================================

/// Runs `apply`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an input path is
/// missing, any page failed, or `--strict` found skipped members or failed
/// blocks.
pub fn run(args: &ApplyArgs) -> Result<(), ClassTabError> {
    let limits = Limits::default();
    let config = load_config(args.config.as_deref(), &limits)?;
    let pages = files::discover(&args.paths)?;
    if pages.is_empty() {
        warn!("no HTML pages found");
    }

    let mut results = Vec::with_capacity(pages.len());
    let mut first_failure = None;
    for page in &pages {
        match process_page(page, &config, args, &limits) {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(path = %page.path.display(), error = %e, "page skipped");
                first_failure.get_or_insert(e.exit_code());
                results.push(PageResult::without_content(
                    page.path.clone(),
                    PageStatus::Failed,
                    Some(e.to_string()),
                ));
            }
        }
    }

    let summary = ApplySummary::from_results(&results);
    print_report(args.format, args.dry_run, &summary, &results)?;

    if let Some(code) = first_failure {
        return Err(ClassTabError::PagesFailed {
            failed: summary.failed_pages,
            total: summary.pages,
            code,
        });
    }
    if args.strict && (summary.skipped_members > 0 || summary.failed_blocks > 0) {
        return Err(ClassTabError::Strict {
            skipped_members: summary.skipped_members,
            failed_blocks: summary.failed_blocks,
        });
    }
    Ok(())
}

/// Reads, transforms and writes one page.
///
/// # Errors
///
/// Returns an error if the page cannot be read, parsed or written.
pub fn process_page(
    page: &PageFile,
    config: &SynthConfig,
    args: &ApplyArgs,
    limits: &Limits,
) -> Result<PageResult, ClassTabError> {
    let read_error = |source| ClassTabError::Read {
        path: page.path.clone(),
        source,
    };

    let size = std::fs::metadata(&page.path).map_err(read_error)?.len();
    if size > limits.max_page_size {
        warn!(
            path = %page.path.display(),
            size,
            limit = limits.max_page_size,
            "page too large, skipping"
        );
        return Ok(PageResult::without_content(
            page.path.clone(),
            PageStatus::TooLarge,
            None,
        ));
    }

    let html = std::fs::read_to_string(&page.path).map_err(read_error)?;
    let (output, report) = transform_html(&html, config).map_err(|source| ClassTabError::Page {
        path: page.path.clone(),
        source,
    })?;

    let changed = !report.inserted.is_empty();
    let destination = page.destination(args.output.as_deref());
    if !args.dry_run && (changed || args.output.is_some()) {
        write_page(&destination, &output)?;
    }

    if changed {
        info!(
            path = %destination.display(),
            tables = report.inserted.len(),
            "inserted summary tables"
        );
    }

    Ok(PageResult {
        path: page.path.clone(),
        status: if changed {
            PageStatus::Updated
        } else {
            PageStatus::Unchanged
        },
        tables_inserted: report.inserted.len(),
        error: None,
        blocks: report.blocks,
        skipped_members: report.skipped_members,
    })
}

fn write_page(path: &Path, contents: &str) -> Result<(), ClassTabError> {
    let write_error = |source| ClassTabError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)
}

// ============================================================================
// Output
// ============================================================================

fn print_report(
    format: OutputFormat,
    dry_run: bool,
    summary: &ApplySummary,
    results: &[PageResult],
) -> Result<(), ClassTabError> {
    match format {
        OutputFormat::Json => {
            let report = ApplyReport {
                dry_run,
                summary,
                pages: results,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Human => {
            for result in results {
                println!("{}", page_line(result));
                for block in &result.blocks {
                    if let BlockOutcome::Failed(reason) = &block.outcome {
                        println!("  {}: {reason}", block.block);
                    }
                }
                for member in &result.skipped_members {
                    println!(
                        "  skipped {} {} in {}: {}",
                        member.kind,
                        member.anchor.as_deref().unwrap_or("(no anchor)"),
                        member.block,
                        member.issue
                    );
                }
            }
            let prefix = if dry_run { "(dry run) " } else { "" };
            println!(
                "{prefix}{} pages: {} updated, {} tables inserted, {} skipped members, {} failed",
                summary.pages,
                summary.updated,
                summary.tables_inserted,
                summary.skipped_members,
                summary.failed_pages
            );
        }
    }
    Ok(())
}

fn page_line(result: &PageResult) -> String {
    let path = result.path.display();
    match result.status {
        PageStatus::Updated => format!("{path}: {} tables inserted", result.tables_inserted),
        PageStatus::Unchanged => format!("{path}: unchanged"),
        PageStatus::TooLarge => format!("{path}: skipped (too large)"),
        PageStatus::Failed => format!(
            "{path}: failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        ),
    }
}
