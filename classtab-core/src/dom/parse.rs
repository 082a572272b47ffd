//! Tolerant HTML parser.
//!
//! Handles the markup documentation generators actually emit: doctype,
//! comments, void and self-closing elements, raw-text elements, quoted and
//! unquoted attributes, implicitly closed paragraphs, list items and table
//! cells. Stray end tags are dropped. Entities are not decoded here.

use indexmap::IndexMap;

use super::{Document, Element, NodeData, NodeId};
use crate::error::HtmlParseError;

/// Parses `html` into a [`Document`].
///
/// # Errors
///
/// Returns [`HtmlParseError`] for an unterminated comment, declaration, start
/// tag or raw-text element.
pub fn parse_html(html: &str) -> Result<Document, HtmlParseError> {
    Parser::new(html).run()
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    doc: Document,
    stack: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            doc,
            stack: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn current_tag(&self) -> Option<&str> {
        self.doc.tag_name(self.current())
    }

    fn run(mut self) -> Result<Document, HtmlParseError> {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'<' {
                if self.starts_with(b"<!--") {
                    self.comment()?;
                    continue;
                }
                if self.starts_with(b"<!") || self.starts_with(b"<?") {
                    self.declaration()?;
                    continue;
                }
                if self.starts_with(b"</") {
                    self.end_tag()?;
                    continue;
                }
                if self
                    .bytes
                    .get(self.pos + 1)
                    .is_some_and(u8::is_ascii_alphabetic)
                {
                    self.start_tag()?;
                    continue;
                }
            }
            self.text();
        }
        Ok(self.doc)
    }

    fn starts_with(&self, needle: &[u8]) -> bool {
        self.bytes[self.pos..]
            .get(..needle.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(needle))
    }

    fn find_from(&self, from: usize, needle: &[u8]) -> Option<usize> {
        self.bytes
            .get(from..)?
            .windows(needle.len())
            .position(|w| w == needle)
            .map(|p| p + from)
    }

    // ------------------------------------------------------------------------
    // Markup kinds
    // ------------------------------------------------------------------------

    fn comment(&mut self) -> Result<(), HtmlParseError> {
        let body_start = self.pos + 4;
        let end = self
            .find_from(body_start, b"-->")
            .ok_or_else(|| HtmlParseError::new(self.pos, "unclosed comment"))?;
        let body = self.src[body_start..end].to_string();
        self.doc.push(Some(self.current()), NodeData::Comment(body));
        self.pos = end + 3;
        Ok(())
    }

    fn declaration(&mut self) -> Result<(), HtmlParseError> {
        let end = self
            .find_from(self.pos, b">")
            .ok_or_else(|| HtmlParseError::new(self.pos, "unclosed declaration"))?;
        let inner = &self.src[self.pos + 2..end];
        let data = if self.bytes[self.pos + 1] == b'?' {
            // Processing instructions become bogus comments, as in browsers.
            NodeData::Comment(format!("?{inner}"))
        } else {
            NodeData::Doctype(inner.to_string())
        };
        self.doc.push(Some(self.current()), data);
        self.pos = end + 1;
        Ok(())
    }

    fn text(&mut self) {
        let start = self.pos;
        // Always consume at least one byte so a lone '<' becomes text.
        self.pos += 1;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'<' {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        let parent = self.current();
        // Merge with a preceding text sibling produced by a lone '<'.
        if let Some(&last) = self.doc.children(parent).last()
            && let Some(NodeData::Text(prev)) =
                self.doc.nodes.get_mut(last.index()).map(|n| &mut n.data)
        {
            prev.push_str(text);
            return;
        }
        self.doc.push(Some(parent), NodeData::Text(text.to_string()));
    }

    fn end_tag(&mut self) -> Result<(), HtmlParseError> {
        let name_start = self.pos + 2;
        let mut i = name_start;
        while i < self.bytes.len() && is_tag_char(self.bytes[i]) {
            i += 1;
        }
        let name = self.src[name_start..i].to_ascii_lowercase();
        let end = self
            .find_from(i, b">")
            .ok_or_else(|| HtmlParseError::new(self.pos, "unclosed end tag"))?;
        self.pos = end + 1;

        // Pop to the matching open element; ignore the tag if none is open.
        if let Some(depth) = self
            .stack
            .iter()
            .rposition(|&id| self.doc.tag_name(id) == Some(name.as_str()))
            && depth > 0
        {
            self.stack.truncate(depth);
        }
        Ok(())
    }

    fn start_tag(&mut self) -> Result<(), HtmlParseError> {
        let tag_offset = self.pos;
        let mut i = self.pos + 1;
        while i < self.bytes.len() && is_tag_char(self.bytes[i]) {
            i += 1;
        }
        let name = self.src[self.pos + 1..i].to_ascii_lowercase();

        let mut attrs = IndexMap::new();
        let mut self_closing = false;
        loop {
            skip_ws(self.bytes, &mut i);
            match self.bytes.get(i) {
                None => return Err(HtmlParseError::new(tag_offset, "unclosed start tag")),
                Some(b'>') => {
                    i += 1;
                    break;
                }
                Some(b'/') => {
                    if self.bytes.get(i + 1) == Some(&b'>') {
                        self_closing = true;
                        i += 2;
                        break;
                    }
                    i += 1;
                    continue;
                }
                Some(_) => {}
            }

            let attr_start = i;
            while i < self.bytes.len() && is_attr_name_char(self.bytes[i]) {
                i += 1;
            }
            if i == attr_start {
                // Unexpected byte such as a stray quote; skip it.
                i += 1;
                continue;
            }
            let attr_name = self.src[attr_start..i].to_ascii_lowercase();

            skip_ws(self.bytes, &mut i);
            let value = if self.bytes.get(i) == Some(&b'=') {
                i += 1;
                skip_ws(self.bytes, &mut i);
                self.attr_value(&mut i)?
            } else {
                String::new()
            };
            attrs.entry(attr_name).or_insert(value);
        }
        self.pos = i;

        self.close_implied(&name);
        let element = Element {
            name: name.clone(),
            attrs,
            self_closing,
        };
        let node = self.doc.push(Some(self.current()), NodeData::Element(element));

        if is_raw_text(&name) && !self_closing {
            return self.raw_text(node, &name);
        }
        if !self_closing && !is_void(&name) {
            self.stack.push(node);
        }
        Ok(())
    }

    fn attr_value(&self, i: &mut usize) -> Result<String, HtmlParseError> {
        match self.bytes.get(*i) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let start = *i + 1;
                let end = self
                    .find_from(start, &[quote])
                    .ok_or_else(|| HtmlParseError::new(*i, "unclosed attribute value"))?;
                *i = end + 1;
                let value = &self.src[start..end];
                // Stored values are always emitted double-quoted.
                Ok(if quote == b'\'' {
                    value.replace('"', "&quot;")
                } else {
                    value.to_string()
                })
            }
            _ => {
                let start = *i;
                while *i < self.bytes.len()
                    && !self.bytes[*i].is_ascii_whitespace()
                    && self.bytes[*i] != b'>'
                {
                    *i += 1;
                }
                Ok(self.src[start..*i].replace('"', "&quot;"))
            }
        }
    }

    fn raw_text(&mut self, node: NodeId, name: &str) -> Result<(), HtmlParseError> {
        let closing = format!("</{name}");
        let mut search = self.pos;
        let close = loop {
            let Some(candidate) = self.find_ci(search, closing.as_bytes()) else {
                return Err(HtmlParseError::new(
                    self.pos,
                    format!("unclosed <{name}> element"),
                ));
            };
            let after = self.bytes.get(candidate + closing.len());
            if after.is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/') {
                break candidate;
            }
            search = candidate + 1;
        };
        if close > self.pos {
            let body = self.src[self.pos..close].to_string();
            self.doc.push(Some(node), NodeData::Text(body));
        }
        let end = self
            .find_from(close, b">")
            .ok_or_else(|| HtmlParseError::new(close, "unclosed end tag"))?;
        self.pos = end + 1;
        Ok(())
    }

    fn find_ci(&self, from: usize, needle: &[u8]) -> Option<usize> {
        self.bytes
            .get(from..)?
            .windows(needle.len())
            .position(|w| w.eq_ignore_ascii_case(needle))
            .map(|p| p + from)
    }

    /// Closes elements whose end tag HTML allows to be omitted.
    fn close_implied(&mut self, opening: &str) {
        loop {
            let Some(top) = self.current_tag() else {
                return;
            };
            let closes = match opening {
                "li" => top == "li",
                "dt" | "dd" => matches!(top, "dt" | "dd"),
                "tr" => matches!(top, "tr" | "td" | "th"),
                "td" | "th" => matches!(top, "td" | "th"),
                "option" => top == "option",
                "tbody" | "thead" | "tfoot" => {
                    matches!(top, "tbody" | "thead" | "tfoot" | "tr" | "td" | "th")
                }
                _ => top == "p" && closes_paragraph(opening),
            };
            if !closes || self.stack.len() <= 1 {
                return;
            }
            self.stack.pop();
        }
    }
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

const fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

const fn is_attr_name_char(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'/' | b'>' | b'=' | b'"' | b'\'' | b'<')
}

/// Elements that never have content or an end tag.
#[must_use]
pub(crate) fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "textarea" | "title")
}

fn closes_paragraph(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "div"
            | "dl"
            | "fieldset"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hr"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "ul"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags_under(doc: &Document, id: NodeId) -> Vec<String> {
        doc.element_children(id)
            .into_iter()
            .filter_map(|c| doc.tag_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_nested_elements_and_attrs() {
        let doc = parse_html(r#"<div class="a b" id=x><span>hi</span></div>"#).unwrap();
        let div = doc.element_children(doc.root())[0];
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.attr(div, "class"), Some("a b"));
        assert_eq!(doc.attr(div, "id"), Some("x"));
        assert_eq!(doc.text_content(div), "hi");
    }

    #[test]
    fn test_doctype_and_comment() {
        let doc = parse_html("<!DOCTYPE html><!-- note --><p>x</p>").unwrap();
        let kids = doc.children(doc.root());
        assert_eq!(doc.data(kids[0]), Some(&NodeData::Doctype("DOCTYPE html".into())));
        assert_eq!(doc.data(kids[1]), Some(&NodeData::Comment(" note ".into())));
    }

    #[test]
    fn test_void_elements_do_not_nest() {
        let doc = parse_html("<div><br><img src=a.png><span>t</span></div>").unwrap();
        let div = doc.element_children(doc.root())[0];
        assert_eq!(tags_under(&doc, div), ["br", "img", "span"]);
    }

    #[test]
    fn test_self_closing_syntax() {
        let doc = parse_html(r#"<svg><path d="M0"/><path d="M1"/></svg>"#).unwrap();
        let svg = doc.element_children(doc.root())[0];
        assert_eq!(tags_under(&doc, svg), ["path", "path"]);
    }

    #[test]
    fn test_script_body_is_raw() {
        let doc = parse_html("<script>if (a < b) { x = '</div>'; }</script><p>after</p>").unwrap();
        let kids = doc.element_children(doc.root());
        assert_eq!(tags_under(&doc, doc.root()), ["script", "p"]);
        assert_eq!(doc.text_content(kids[0]), "if (a < b) { x = '</div>'; }");
    }

    #[test]
    fn test_implied_list_item_close() {
        let doc = parse_html("<ul><li>a<li>b</ul>").unwrap();
        let ul = doc.element_children(doc.root())[0];
        assert_eq!(tags_under(&doc, ul), ["li", "li"]);
    }

    #[test]
    fn test_implied_paragraph_close_by_block() {
        let doc = parse_html("<p>one<div>two</div>").unwrap();
        assert_eq!(tags_under(&doc, doc.root()), ["p", "div"]);
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let doc = parse_html("<div>a</span>b</div>").unwrap();
        let div = doc.element_children(doc.root())[0];
        assert_eq!(doc.text_content(div), "ab");
    }

    #[test]
    fn test_lone_less_than_is_text() {
        let doc = parse_html("<p>a < b</p>").unwrap();
        let p = doc.element_children(doc.root())[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "a < b");
    }

    #[test]
    fn test_single_quoted_value_with_double_quote() {
        let doc = parse_html(r#"<a title='say "hi"'>x</a>"#).unwrap();
        let a = doc.element_children(doc.root())[0];
        assert_eq!(doc.attr(a, "title"), Some("say &quot;hi&quot;"));
    }

    #[test]
    fn test_duplicate_attribute_keeps_first() {
        let doc = parse_html(r#"<a id="one" id="two"></a>"#).unwrap();
        let a = doc.element_children(doc.root())[0];
        assert_eq!(doc.attr(a, "id"), Some("one"));
    }

    #[test]
    fn test_unclosed_comment_is_error() {
        let err = parse_html("<p>x</p><!-- never").unwrap_err();
        assert_eq!(err.offset, 8);
    }

    #[test]
    fn test_unclosed_start_tag_is_error() {
        assert!(parse_html("<div class=\"a\"").is_err());
    }

    #[test]
    fn test_unclosed_script_is_error() {
        assert!(parse_html("<script>var a = 1;").is_err());
    }
}
