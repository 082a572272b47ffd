//! Page model and summary table types.
//!
//! The synthesizer never touches HTML directly. It reads a page through
//! [`PageModel`] and writes finished tables through [`TableSink`], so the
//! same logic runs against a parsed [`crate::dom::Document`] or an in-memory
//! fixture.

use serde::Serialize;

// ============================================================================
// Member Kinds
// ============================================================================

/// The three member kinds a class summary table has columns for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// A `@property`.
    Property,
    /// A plain data attribute.
    Attribute,
    /// A method.
    Method,
}

impl MemberKind {
    /// All kinds, in column order.
    pub const ALL: [Self; 3] = [Self::Property, Self::Attribute, Self::Method];

    /// Column index of this kind.
    #[must_use]
    pub const fn column(self) -> usize {
        match self {
            Self::Property => 0,
            Self::Attribute => 1,
            Self::Method => 2,
        }
    }

    /// Cross-reference role, as used in `py-<role>` classes.
    #[must_use]
    pub const fn role(self) -> &'static str {
        match self {
            Self::Property => "prop",
            Self::Attribute => "attr",
            Self::Method => "meth",
        }
    }

    /// Class placed on the header label span.
    #[must_use]
    pub const fn header_class(self) -> &'static str {
        match self {
            Self::Property => "properties",
            Self::Attribute => "attributes",
            Self::Method => "methods",
        }
    }

    /// Default header label.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Property => "Properties",
            Self::Attribute => "Attributes",
            Self::Method => "Methods",
        }
    }
}

impl std::fmt::Display for MemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Property => "property",
            Self::Attribute => "attribute",
            Self::Method => "method",
        };
        f.write_str(name)
    }
}

/// Label shown for a member in the summary table.
///
/// Methods get `()` appended unless the name already ends in `]`, which
/// marks subscript notation such as `__getitem__[key]`. Properties and
/// attributes are shown verbatim.
#[must_use]
pub fn display_label(kind: MemberKind, name: &str) -> String {
    if kind == MemberKind::Method && !name.ends_with(']') {
        format!("{name}()")
    } else {
        name.to_string()
    }
}

// ============================================================================
// Summary Table
// ============================================================================

/// One member resolved from the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Which column it belongs to.
    pub kind: MemberKind,
    /// Display name as rendered by the generator.
    pub name: String,
    /// In-page anchor identifier.
    pub anchor: String,
}

/// A populated table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberCell {
    /// Member kind; selects the `py-<role>` class.
    pub kind: MemberKind,
    /// Text shown in the cell (see [`display_label`]).
    pub label: String,
    /// Link target without the leading `#`.
    pub anchor: String,
}

impl MemberCell {
    /// Builds the cell for `member`.
    #[must_use]
    pub fn for_member(member: &Member) -> Self {
        Self {
            kind: member.kind,
            label: display_label(member.kind, &member.name),
            anchor: member.anchor.clone(),
        }
    }

    /// The `href` value, `#<anchor>`.
    #[must_use]
    pub fn href(&self) -> String {
        format!("#{}", self.anchor)
    }
}

/// A labeled header slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderCell {
    /// Kind this column lists.
    pub kind: MemberKind,
    /// Header text.
    pub label: String,
}

/// Synthesized summary of one class.
///
/// Rows always have one slot per [`MemberKind`]; a `None` slot is rendered as
/// a blank placeholder cell so columns stay aligned. Header slots are `None`
/// for kinds without members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    /// Header slots, in column order.
    pub header: [Option<HeaderCell>; 3],
    /// Data rows, in member index order.
    pub rows: Vec<[Option<MemberCell>; 3]>,
}

impl SummaryTable {
    /// Number of labeled header slots.
    #[must_use]
    pub fn header_labels(&self) -> usize {
        self.header.iter().flatten().count()
    }

    /// Number of populated data cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.iter().flatten().count()).sum()
    }

    /// Whether the table lists no members at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Page Model Traits
// ============================================================================

/// Read access to a rendered documentation page.
pub trait PageModel {
    /// Handle to a class block.
    type Block: Copy;
    /// Handle to a member-detail entry.
    type Member: Copy;

    /// All class blocks on the page, in document order.
    fn class_blocks(&self) -> Vec<Self::Block>;

    /// Members of `kind` belonging to `block`, in document order.
    fn members_of(&self, block: Self::Block, kind: MemberKind) -> Vec<Self::Member>;

    /// Display name of a member; `None` if the name element is missing.
    fn name_of(&self, member: Self::Member) -> Option<String>;

    /// Anchor identifier of a member; `None` if it has none.
    fn id_of(&self, member: Self::Member) -> Option<String>;

    /// Whether `block` already holds a synthesized summary table.
    fn has_summary(&self, _block: Self::Block) -> bool {
        false
    }

    /// Human-readable description of a block for diagnostics.
    fn describe_block(&self, _block: Self::Block) -> String {
        String::from("class block")
    }
}

/// Write access: places a finished table into a class block.
pub trait TableSink: PageModel {
    /// Handle returned for an inserted table.
    type Inserted;
    /// Error raised when a block cannot take a table.
    type Error: std::error::Error;

    /// Materializes `table` and inserts it into `block`'s content region
    /// before the first detail element, or at its end if there is none.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the block has no content region.
    fn insert_table(
        &mut self,
        block: Self::Block,
        table: &SummaryTable,
    ) -> Result<Self::Inserted, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_gets_parens() {
        assert_eq!(display_label(MemberKind::Method, "run"), "run()");
    }

    #[test]
    fn test_subscript_method_label_unchanged() {
        assert_eq!(
            display_label(MemberKind::Method, "__getitem__]"),
            "__getitem__]"
        );
        assert_eq!(display_label(MemberKind::Method, "pixels[i]"), "pixels[i]");
    }

    #[test]
    fn test_property_and_attribute_labels_verbatim() {
        assert_eq!(display_label(MemberKind::Property, "width"), "width");
        assert_eq!(display_label(MemberKind::Attribute, "run"), "run");
        assert_eq!(display_label(MemberKind::Property, "f()"), "f()");
    }

    #[test]
    fn test_method_ending_in_paren_still_suffixed() {
        assert_eq!(display_label(MemberKind::Method, "call)"), "call)()");
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(MemberKind::Property.role(), "prop");
        assert_eq!(MemberKind::Attribute.role(), "attr");
        assert_eq!(MemberKind::Method.role(), "meth");
        let columns: Vec<_> = MemberKind::ALL.iter().map(|k| k.column()).collect();
        assert_eq!(columns, [0, 1, 2]);
    }

    #[test]
    fn test_cell_href() {
        let cell = MemberCell::for_member(&Member {
            kind: MemberKind::Method,
            name: "draw".into(),
            anchor: "chafa.Canvas.draw".into(),
        });
        assert_eq!(cell.href(), "#chafa.Canvas.draw");
        assert_eq!(cell.label, "draw()");
    }

    #[test]
    fn test_table_counts() {
        let table = SummaryTable::default();
        assert!(table.is_empty());
        assert_eq!(table.header_labels(), 0);
        assert_eq!(table.cell_count(), 0);
    }
}
