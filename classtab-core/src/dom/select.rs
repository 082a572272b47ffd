//! Class-chain selectors.
//!
//! A deliberately small subset of CSS: a whitespace-separated chain of
//! compound steps joined by the descendant combinator, where each step is an
//! optional tag name followed by any number of `.class` tokens, e.g.
//! `.descname .pre` or `dl.py.method dt.sig`. That is all the marker
//! configuration ever needs.

use std::fmt;
use std::str::FromStr;

use super::{Document, NodeId};

/// One compound step: `tag.class.class`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    tag: Option<String>,
    classes: Vec<String>,
}

impl Step {
    /// Step matching elements that carry `class`.
    #[must_use]
    pub fn class(class: &str) -> Self {
        Self {
            tag: None,
            classes: vec![class.to_string()],
        }
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(el) = doc.element(id) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|tag| tag != el.name) {
            return false;
        }
        self.classes.iter().all(|class| el.has_class(class))
    }
}

/// A descendant chain of [`Step`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassChain {
    steps: Vec<Step>,
}

/// Error for a selector outside the supported subset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported selector '{selector}': {reason}")]
pub struct SelectorError {
    /// The offending selector text.
    pub selector: String,
    /// Why it was rejected.
    pub reason: String,
}

impl FromStr for ClassChain {
    type Err = SelectorError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        let fail = |reason: &str| SelectorError {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        let mut steps = Vec::new();
        for part in selector.split_ascii_whitespace() {
            let mut pieces = part.split('.');
            let tag = pieces.next().unwrap_or_default();
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(fail("only tag names and .class tokens are supported"));
            }
            let classes: Vec<String> = pieces.map(str::to_string).collect();
            if classes.iter().any(String::is_empty) {
                return Err(fail("empty class token"));
            }
            if classes
                .iter()
                .any(|c| c.contains(['#', '[', ']', ':', '>', '+', '~', '*', ',']))
            {
                return Err(fail("only tag names and .class tokens are supported"));
            }
            steps.push(Step {
                tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
                classes,
            });
        }
        if steps.is_empty() {
            return Err(fail("selector is empty"));
        }
        Ok(Self { steps })
    }
}

impl fmt::Display for ClassChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if let Some(tag) = &step.tag {
                f.write_str(tag)?;
            }
            for class in &step.classes {
                write!(f, ".{class}")?;
            }
        }
        Ok(())
    }
}

impl ClassChain {
    /// Chain of class-only steps, e.g. `["descname", "pre"]` → `.descname .pre`.
    #[must_use]
    pub fn of_classes(classes: &[&str]) -> Self {
        Self {
            steps: classes.iter().map(|c| Step::class(c)).collect(),
        }
    }

    /// Whether `id` matches the chain, with ancestor steps matched only
    /// strictly below `scope`. Unlike DOM `querySelectorAll`, an ancestor
    /// above `scope` (or `scope` itself) never satisfies a step.
    #[must_use]
    pub fn matches_within(&self, doc: &Document, id: NodeId, scope: NodeId) -> bool {
        let Some((last, rest)) = self.steps.split_last() else {
            return false;
        };
        if !last.matches(doc, id) {
            return false;
        }
        let mut cursor = doc.parent(id);
        for step in rest.iter().rev() {
            loop {
                match cursor {
                    Some(node) if node != scope => {
                        cursor = doc.parent(node);
                        if step.matches(doc, node) {
                            break;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    /// All descendants of `scope` matching the chain, in document order.
    #[must_use]
    pub fn query_all(&self, doc: &Document, scope: NodeId) -> Vec<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .filter(|&id| self.matches_within(doc, id, scope))
            .collect()
    }

    /// First descendant of `scope` matching the chain.
    #[must_use]
    pub fn query_first(&self, doc: &Document, scope: NodeId) -> Option<NodeId> {
        doc.descendants(scope)
            .into_iter()
            .find(|&id| self.matches_within(doc, id, scope))
    }
}
