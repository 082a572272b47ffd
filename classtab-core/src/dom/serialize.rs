//! HTML serialization.

use std::fmt::Write as _;

use super::parse::is_void;
use super::{Document, NodeData, NodeId};

/// Serializes the whole document back to HTML.
///
/// Text, comments, doctype and attribute values are written exactly as
/// stored, so a parse/serialize cycle without mutations reproduces the
/// source apart from attribute quoting and omitted end tags.
#[must_use]
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    for &child in doc.children(doc.root()) {
        write_node(doc, child, &mut out);
    }
    out
}

/// Serializes a single node and its subtree.
#[must_use]
pub fn node_to_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Work item for [`write_node`]: emit a node, or close an element whose
/// children have been written.
enum Frame {
    Open(NodeId),
    Close(NodeId),
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let mut stack = vec![Frame::Open(id)];
    while let Some(frame) = stack.pop() {
        let id = match frame {
            Frame::Open(id) => id,
            Frame::Close(id) => {
                if let Some(el) = doc.element(id) {
                    let _ = write!(out, "</{}>", el.name);
                }
                continue;
            }
        };
        match doc.data(id) {
            None | Some(NodeData::Document) => {
                stack.extend(doc.children(id).iter().rev().map(|&c| Frame::Open(c)));
            }
            Some(NodeData::Doctype(inner)) => {
                let _ = write!(out, "<!{inner}>");
            }
            Some(NodeData::Comment(body)) => {
                let _ = write!(out, "<!--{body}-->");
            }
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element(el)) => {
                out.push('<');
                out.push_str(&el.name);
                for (name, value) in &el.attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{value}\"");
                    }
                }
                let children = doc.children(id);
                if is_void(&el.name) {
                    out.push('>');
                    continue;
                }
                if el.self_closing && children.is_empty() {
                    out.push_str(" />");
                    continue;
                }
                out.push('>');
                stack.push(Frame::Close(id));
                stack.extend(children.iter().rev().map(|&c| Frame::Open(c)));
            }
        }
    }
}
