//! HTML-backed page model.
//!
//! [`HtmlPage`] reads Sphinx autodoc markup out of a parsed
//! [`Document`] and writes summary tables back into it using the
//! documentation's own cross-reference markup:
//!
//! ```html
//! <td><a class="reference internal" href="#pkg.Cls.run"><code class="xref py py-meth docutils literal notranslate"><span class="sig-name descname"><span class="pre">run()</span></span></code></a></td>
//! ```
//!
//! Property cells carry the bare `pre` span, matching the element their name
//! is read from.

use classtab_core::config::Markers;
use classtab_core::dom::select::ClassChain;
use classtab_core::dom::{Document, NodeId, unescape};
use classtab_core::model::{MemberCell, MemberKind, PageModel, SummaryTable, TableSink};

use crate::error::SynthError;

const LINK_CLASS: &str = "reference internal";
const CODE_CLASSES: &str = "docutils literal notranslate";
const NAME_CLASS: &str = "pre";
const SIG_NAME_CLASS: &str = "sig-name";

/// Handle to one member-detail entry: its signature element and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlMember {
    /// The signature element carrying the anchor `id`.
    pub signature: NodeId,
    /// Which column the member belongs to.
    pub kind: MemberKind,
}

/// A parsed page plus the markers used to read it.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    doc: Document,
    markers: Markers,
    blocks: ClassChain,
    entries: [ClassChain; 3],
    property_name: ClassChain,
    name: ClassChain,
}

impl HtmlPage {
    /// Wraps `doc`, reading it with `markers`.
    #[must_use]
    pub fn new(doc: Document, markers: &Markers) -> Self {
        let entries = MemberKind::ALL
            .map(|kind| ClassChain::of_classes(&[markers.entry(kind), &markers.signature]));
        Self {
            doc,
            blocks: ClassChain::of_classes(&[&markers.class_block]),
            entries,
            property_name: ClassChain::of_classes(&[&markers.name, &markers.property_name]),
            name: ClassChain::of_classes(&[&markers.name]),
            markers: markers.clone(),
        }
    }

    /// The underlying document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.doc
    }

    /// Consumes the page, returning the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// The content region of a block: its second element child.
    #[must_use]
    pub fn content_of(&self, block: NodeId) -> Option<NodeId> {
        self.doc.element_children(block).get(1).copied()
    }

    /// First element child of the content region marked as a detail element.
    #[must_use]
    pub fn first_detail(&self, content: NodeId) -> Option<NodeId> {
        self.doc
            .element_children(content)
            .into_iter()
            .find(|&child| self.doc.has_class(child, &self.markers.detail))
    }

    // ------------------------------------------------------------------------
    // Table rendering
    // ------------------------------------------------------------------------

    fn render_table(&mut self, table: &SummaryTable) -> Result<NodeId, SynthError> {
        let doc = &mut self.doc;
        let root = doc.create_element_with_class("table", &self.markers.table);

        let header_row = doc.create_element("tr");
        doc.append_child(root, header_row)?;
        for slot in &table.header {
            let th = doc.create_element("th");
            if let Some(header) = slot {
                let span = doc.create_element_with_class("span", header.kind.header_class());
                let text = doc.create_text(&header.label);
                doc.append_child(span, text)?;
                doc.append_child(th, span)?;
            }
            doc.append_child(header_row, th)?;
        }

        for row in &table.rows {
            let tr = doc.create_element("tr");
            doc.append_child(root, tr)?;
            for slot in row {
                let td = match slot {
                    Some(cell) => render_cell(doc, cell, &self.markers.name)?,
                    None => doc.create_element("td"),
                };
                doc.append_child(tr, td)?;
            }
        }
        Ok(root)
    }
}

fn render_cell(
    doc: &mut Document,
    cell: &MemberCell,
    name_marker: &str,
) -> Result<NodeId, SynthError> {
    let td = doc.create_element("td");
    let link = doc.create_element_with_class("a", LINK_CLASS);
    doc.set_attr(link, "href", &cell.href())?;

    let code_class = format!("xref py py-{} {CODE_CLASSES}", cell.kind.role());
    let code = doc.create_element_with_class("code", &code_class);
    let name = doc.create_element_with_class("span", NAME_CLASS);
    let text = doc.create_text(&cell.label);

    doc.append_child(name, text)?;
    let label = match cell.kind {
        MemberKind::Property => name,
        MemberKind::Attribute | MemberKind::Method => {
            let wrapper =
                doc.create_element_with_class("span", &format!("{SIG_NAME_CLASS} {name_marker}"));
            doc.append_child(wrapper, name)?;
            wrapper
        }
    };
    doc.append_child(code, label)?;
    doc.append_child(link, code)?;
    doc.append_child(td, link)?;
    Ok(td)
}

impl PageModel for HtmlPage {
    type Block = NodeId;
    type Member = HtmlMember;

    fn class_blocks(&self) -> Vec<NodeId> {
        self.blocks.query_all(&self.doc, self.doc.root())
    }

    /// Every matching signature under `block`, including those of nested
    /// class blocks.
    fn members_of(&self, block: NodeId, kind: MemberKind) -> Vec<HtmlMember> {
        self.entries[kind.column()]
            .query_all(&self.doc, block)
            .into_iter()
            .map(|signature| HtmlMember { signature, kind })
            .collect()
    }

    fn name_of(&self, member: HtmlMember) -> Option<String> {
        let chain = match member.kind {
            MemberKind::Property => &self.property_name,
            MemberKind::Attribute | MemberKind::Method => &self.name,
        };
        let node = chain.query_first(&self.doc, member.signature)?;
        let name = self.doc.text_content(node);
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn id_of(&self, member: HtmlMember) -> Option<String> {
        self.doc
            .attr(member.signature, "id")
            .filter(|id| !id.is_empty())
            .map(unescape)
    }

    fn has_summary(&self, block: NodeId) -> bool {
        self.content_of(block).is_some_and(|content| {
            self.doc.element_children(content).into_iter().any(|child| {
                self.doc.tag_name(child) == Some("table")
                    && self.doc.has_class(child, &self.markers.table)
            })
        })
    }

    fn describe_block(&self, block: NodeId) -> String {
        let anchor = self
            .doc
            .element_children(block)
            .first()
            .and_then(|&sig| self.doc.attr(sig, "id"))
            .map(unescape);
        match anchor {
            Some(anchor) => format!("class {anchor}"),
            None => format!("class block {block}"),
        }
    }
}

impl TableSink for HtmlPage {
    type Inserted = NodeId;
    type Error = SynthError;

    fn insert_table(&mut self, block: NodeId, table: &SummaryTable) -> Result<NodeId, SynthError> {
        let content = self
            .content_of(block)
            .ok_or_else(|| SynthError::MissingContent {
                block: self.describe_block(block),
            })?;
        let rendered = self.render_table(table)?;
        match self.first_detail(content) {
            Some(detail) => self.doc.insert_before(content, rendered, detail)?,
            None => self.doc.append_child(content, rendered)?,
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classtab_core::dom::{node_to_html, parse_html};
    use classtab_core::model::{HeaderCell, MemberKind};

    const CANVAS: &str = r#"<dl class="py class">
<dt class="sig sig-object py" id="chafa.Canvas"><em class="property"><span class="pre">class</span> </em><span class="sig-name descname"><span class="pre">Canvas</span></span></dt>
<dd><p>A canvas.</p>
<dl class="py property">
<dt class="sig sig-object py" id="chafa.Canvas.width"><em class="property"><span class="pre">property</span> </em><span class="sig-name descname"><span class="pre">width</span></span></dt>
<dd><p>Width.</p></dd></dl>
<dl class="py attribute">
<dt class="sig sig-object py" id="chafa.Canvas.config"><span class="sig-name descname"><span class="pre">config</span></span></dt>
<dd></dd></dl>
<dl class="py method">
<dt class="sig sig-object py" id="chafa.Canvas.draw_all_pixels"><span class="sig-name descname"><span class="pre">draw_all_pixels</span></span><span class="sig-paren">(</span><span class="sig-paren">)</span></dt>
<dd></dd></dl>
<dl class="py method">
<dt class="sig sig-object py" id="chafa.Canvas.__getitem__"><span class="sig-name descname"><span class="pre">__getitem__]</span></span></dt>
<dd></dd></dl>
</dd></dl>"#;

    fn page(html: &str) -> HtmlPage {
        HtmlPage::new(parse_html(html).unwrap(), &Markers::default())
    }

    #[test]
    fn test_reads_members() {
        let page = page(CANVAS);
        let blocks = page.class_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(page.describe_block(blocks[0]), "class chafa.Canvas");

        let props = page.members_of(blocks[0], MemberKind::Property);
        assert_eq!(props.len(), 1);
        assert_eq!(page.name_of(props[0]).as_deref(), Some("width"));
        assert_eq!(page.id_of(props[0]).as_deref(), Some("chafa.Canvas.width"));

        let methods = page.members_of(blocks[0], MemberKind::Method);
        let names: Vec<_> = methods.iter().filter_map(|&m| page.name_of(m)).collect();
        assert_eq!(names, ["draw_all_pixels", "__getitem__]"]);
    }

    #[test]
    fn test_property_without_pre_wrapper_has_no_name() {
        let html = r#"<dl class="py class"><dt id="C">C</dt><dd>
<dl class="py property"><dt class="sig" id="C.p"><span class="descname">p</span></dt></dl>
</dd></dl>"#;
        let page = page(html);
        let block = page.class_blocks()[0];
        let props = page.members_of(block, MemberKind::Property);
        assert_eq!(page.name_of(props[0]), None);
    }

    #[test]
    fn test_nested_class_members_listed_in_both_blocks() {
        let html = r#"<dl class="py class"><dt id="Outer">Outer</dt><dd>
<dl class="py method"><dt class="sig" id="Outer.a"><span class="descname">a</span></dt></dl>
<dl class="py class"><dt id="Outer.Inner">Inner</dt><dd>
<dl class="py method"><dt class="sig" id="Outer.Inner.b"><span class="descname">b</span></dt></dl>
</dd></dl>
</dd></dl>"#;
        let page = page(html);
        let blocks = page.class_blocks();
        assert_eq!(blocks.len(), 2);
        let outer: Vec<_> = page
            .members_of(blocks[0], MemberKind::Method)
            .into_iter()
            .filter_map(|m| page.id_of(m))
            .collect();
        let inner: Vec<_> = page
            .members_of(blocks[1], MemberKind::Method)
            .into_iter()
            .filter_map(|m| page.id_of(m))
            .collect();
        assert_eq!(outer, ["Outer.a", "Outer.Inner.b"]);
        assert_eq!(inner, ["Outer.Inner.b"]);
    }

    #[test]
    fn test_insert_before_first_detail() {
        let mut page = page(CANVAS);
        let block = page.class_blocks()[0];
        let table = SummaryTable::default();
        let inserted = page.insert_table(block, &table).unwrap();

        let content = page.content_of(block).unwrap();
        let children = page.document().element_children(content);
        assert_eq!(page.document().tag_name(children[0]), Some("p"));
        assert_eq!(children[1], inserted);
        assert!(page.document().has_class(children[2], "py"));
        assert!(page.has_summary(block));
    }

    #[test]
    fn test_append_when_no_detail_element() {
        let mut page = page(r#"<dl class="py class"><dt id="E">E</dt><dd><p>Nothing here.</p></dd></dl>"#);
        let block = page.class_blocks()[0];
        let inserted = page.insert_table(block, &SummaryTable::default()).unwrap();
        let content = page.content_of(block).unwrap();
        assert_eq!(page.document().children(content).last(), Some(&inserted));
    }

    #[test]
    fn test_missing_content_region() {
        let mut page = page(r#"<div class="class"><span>only child</span></div>"#);
        let block = page.class_blocks()[0];
        let err = page.insert_table(block, &SummaryTable::default()).unwrap_err();
        assert!(matches!(err, SynthError::MissingContent { .. }));
    }

    #[test]
    fn test_rendered_markup() {
        let mut page = page(r#"<dl class="py class"><dt id="K">K</dt><dd></dd></dl>"#);
        let block = page.class_blocks()[0];
        let table = SummaryTable {
            header: [
                None,
                None,
                Some(HeaderCell {
                    kind: MemberKind::Method,
                    label: "Methods".to_string(),
                }),
            ],
            rows: vec![[
                None,
                None,
                Some(MemberCell {
                    kind: MemberKind::Method,
                    label: "run()".to_string(),
                    anchor: "K.run".to_string(),
                }),
            ]],
        };
        let inserted = page.insert_table(block, &table).unwrap();
        assert_eq!(
            node_to_html(page.document(), inserted),
            concat!(
                "<table class=\"class_contents\">",
                "<tr><th></th><th></th><th><span class=\"methods\">Methods</span></th></tr>",
                "<tr><td></td><td></td><td><a class=\"reference internal\" href=\"#K.run\">",
                "<code class=\"xref py py-meth docutils literal notranslate\">",
                "<span class=\"sig-name descname\"><span class=\"pre\">run()</span></span>",
                "</code></a></td></tr>",
                "</table>"
            )
        );
    }

    #[test]
    fn test_property_and_attribute_cell_markup() {
        let mut page = page(r#"<dl class="py class"><dt id="K">K</dt><dd></dd></dl>"#);
        let block = page.class_blocks()[0];
        let cell = |kind, label: &str| {
            Some(MemberCell {
                kind,
                label: label.to_string(),
                anchor: format!("K.{label}"),
            })
        };
        let table = SummaryTable {
            header: [None, None, None],
            rows: vec![[
                cell(MemberKind::Property, "width"),
                cell(MemberKind::Attribute, "mode"),
                None,
            ]],
        };
        let inserted = page.insert_table(block, &table).unwrap();
        let html = node_to_html(page.document(), inserted);
        assert!(html.contains(concat!(
            "<code class=\"xref py py-prop docutils literal notranslate\">",
            "<span class=\"pre\">width</span></code>"
        )));
        assert!(html.contains(concat!(
            "<code class=\"xref py py-attr docutils literal notranslate\">",
            "<span class=\"sig-name descname\"><span class=\"pre\">mode</span></span></code>"
        )));
    }
}
