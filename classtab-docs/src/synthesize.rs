//! Per-page table synthesis.
//!
//! Walks every class block of a page, collects its members, builds the
//! summary table and hands it to the page's [`TableSink`]. Failures are
//! isolated: a malformed member is skipped, a malformed block is reported,
//! and processing continues with the rest of the page.

use classtab_core::config::SynthConfig;
use classtab_core::dom::{NodeId, parse_html, to_html};
use classtab_core::model::{Member, MemberKind, PageModel, SummaryTable, TableSink};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SynthError;
use crate::html::HtmlPage;
use crate::table::{ClassMembers, build_table};

// ============================================================================
// Report Types
// ============================================================================

/// Why a member was left out of its class's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberIssue {
    /// No descriptive name element, or it was empty.
    MissingName,
    /// The signature element has no `id`.
    MissingAnchor,
}

impl std::fmt::Display for MemberIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => f.write_str("missing name element"),
            Self::MissingAnchor => f.write_str("missing anchor id"),
        }
    }
}

/// A member that could not be listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMember {
    /// Block the member belongs to.
    pub block: String,
    /// Member kind.
    pub kind: MemberKind,
    /// Anchor, when it could be read.
    pub anchor: Option<String>,
    /// What was wrong.
    pub issue: MemberIssue,
}

/// What happened to one class block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum BlockOutcome {
    /// A table was inserted.
    Inserted,
    /// The block already held a summary table.
    AlreadyPresent,
    /// The class documents no members and empty tables are disabled.
    Empty,
    /// The table could not be inserted.
    Failed(String),
}

/// Statistics for one class block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReport {
    /// Block description, e.g. `class chafa.Canvas`.
    pub block: String,
    /// Properties listed.
    pub properties: usize,
    /// Attributes listed.
    pub attributes: usize,
    /// Methods listed.
    pub methods: usize,
    /// Data rows in the table.
    pub rows: usize,
    /// Outcome.
    pub outcome: BlockOutcome,
}

/// Result of synthesizing one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport<I> {
    /// Handles of the inserted tables, in block order.
    pub inserted: Vec<I>,
    /// One entry per class block.
    pub blocks: Vec<BlockReport>,
    /// Members left out of their tables.
    pub skipped_members: Vec<SkippedMember>,
}

impl<I> Default for SynthesisReport<I> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            blocks: Vec::new(),
            skipped_members: Vec::new(),
        }
    }
}

impl<I> SynthesisReport<I> {
    /// Blocks whose table could not be inserted.
    pub fn failed_blocks(&self) -> impl Iterator<Item = &BlockReport> {
        self.blocks
            .iter()
            .filter(|b| matches!(b.outcome, BlockOutcome::Failed(_)))
    }

    /// Whether every block and member was handled cleanly.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_members.is_empty() && self.failed_blocks().next().is_none()
    }
}

/// The table planned for one block, without touching the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedTable {
    /// Block description.
    pub block: String,
    /// Table that would be inserted.
    pub table: SummaryTable,
}

// ============================================================================
// Synthesis
// ============================================================================

/// Collects the members of `block`, recording the ones that cannot be listed.
pub fn collect_members<P: PageModel>(
    page: &P,
    block: P::Block,
    skipped: &mut Vec<SkippedMember>,
) -> ClassMembers {
    let mut members = ClassMembers::default();
    for kind in MemberKind::ALL {
        for handle in page.members_of(block, kind) {
            let anchor = page.id_of(handle);
            let issue = match (page.name_of(handle), anchor.clone()) {
                (Some(name), Some(anchor)) => {
                    members.push(Member { kind, name, anchor });
                    continue;
                }
                (None, _) => MemberIssue::MissingName,
                (Some(_), None) => MemberIssue::MissingAnchor,
            };
            let description = page.describe_block(block);
            warn!(
                block = %description,
                %kind,
                anchor = anchor.as_deref().unwrap_or("-"),
                %issue,
                "skipping member"
            );
            skipped.push(SkippedMember {
                block: description,
                kind,
                anchor,
                issue,
            });
        }
    }
    members
}

/// Plans the table for every block without mutating the page.
pub fn plan_page<P: PageModel>(page: &P, config: &SynthConfig) -> Vec<PlannedTable> {
    let mut skipped = Vec::new();
    page.class_blocks()
        .into_iter()
        .map(|block| {
            let members = collect_members(page, block, &mut skipped);
            PlannedTable {
                block: page.describe_block(block),
                table: build_table(&members, &config.labels),
            }
        })
        .collect()
}

/// Synthesizes and inserts a summary table for every class block of `page`.
///
/// Never fails as a whole: per-block insertion errors end up in
/// [`BlockOutcome::Failed`], unreadable members in
/// [`SynthesisReport::skipped_members`].
pub fn synthesize_page<S: TableSink>(
    page: &mut S,
    config: &SynthConfig,
) -> SynthesisReport<S::Inserted> {
    let mut report = SynthesisReport::default();

    for block in page.class_blocks() {
        let description = page.describe_block(block);

        if config.skip_existing && page.has_summary(block) {
            debug!(block = %description, "summary table already present");
            report.blocks.push(BlockReport {
                block: description,
                properties: 0,
                attributes: 0,
                methods: 0,
                rows: 0,
                outcome: BlockOutcome::AlreadyPresent,
            });
            continue;
        }

        let members = collect_members(page, block, &mut report.skipped_members);
        let table = build_table(&members, &config.labels);
        debug!(
            block = %description,
            header = ?table.header.iter().map(|h| h.as_ref().map(|h| h.label.as_str())).collect::<Vec<_>>(),
            rows = table.rows.len(),
            "built summary table"
        );

        let outcome = if config.skip_empty && table.is_empty() {
            BlockOutcome::Empty
        } else {
            match page.insert_table(block, &table) {
                Ok(handle) => {
                    report.inserted.push(handle);
                    BlockOutcome::Inserted
                }
                Err(e) => {
                    warn!(block = %description, error = %e, "could not insert summary table");
                    BlockOutcome::Failed(e.to_string())
                }
            }
        };

        report.blocks.push(BlockReport {
            block: description,
            properties: members.count(MemberKind::Property),
            attributes: members.count(MemberKind::Attribute),
            methods: members.count(MemberKind::Method),
            rows: table.rows.len(),
            outcome,
        });
    }

    report
}

/// Parses `html`, synthesizes its tables and serializes the result.
///
/// # Errors
///
/// Returns [`SynthError::Parse`] if the page cannot be parsed.
pub fn transform_html(
    html: &str,
    config: &SynthConfig,
) -> Result<(String, SynthesisReport<NodeId>), SynthError> {
    let doc = parse_html(html)?;
    let mut page = HtmlPage::new(doc, &config.markers);
    let report = synthesize_page(&mut page, config);
    Ok((to_html(page.document()), report))
}

/// Parses `html` and plans its tables without modifying anything.
///
/// # Errors
///
/// Returns [`SynthError::Parse`] if the page cannot be parsed.
pub fn inspect_html(html: &str, config: &SynthConfig) -> Result<Vec<PlannedTable>, SynthError> {
    let doc = parse_html(html)?;
    let page = HtmlPage::new(doc, &config.markers);
    Ok(plan_page(&page, config))
}
