//! Minimal markup tree for the configuration form
//!
//! [`MarkupNode`] is a tag with ordered attributes, optional inline text and
//! child nodes. Tree construction lives in [`crate::render`]; turning a tree
//! into text is the separate [`serialize`] step, so tests can assert on the
//! structure directly.

use std::fmt::Write;

/// Elements written without a closing tag
const VOID_TAGS: &[&str] = &["input", "link", "meta", "br"];

/// A node of the rendered form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupNode {
    pub tag: String,

    /// Attributes in insertion order; `None` values render as bare flags
    /// (`checked`, `selected`)
    pub attributes: Vec<(String, Option<String>)>,

    pub text: Option<String>,

    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute, replacing any previous value in place
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name.into(), Some(value.into()));
        self
    }

    /// Set an attribute only when a value is present
    pub fn attr_opt(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Set a value-less attribute
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.set(name.into(), None);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = MarkupNode>) -> Self {
        self.children.extend(children);
        self
    }

    fn set(&mut self, name: String, value: Option<String>) {
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Value of an attribute; `Some(None)` for a present flag
    pub fn get_attr(&self, name: &str) -> Option<Option<&str>> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// All descendants (including self) with the given tag, depth-first
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a MarkupNode> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.tag == tag {
                found.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        found
    }

    /// First descendant (including self) whose `id` attribute matches
    pub fn find_by_id<'a>(&'a self, id: &str) -> Option<&'a MarkupNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.get_attr("id") == Some(Some(id)) {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a tree to markup text
pub fn serialize(node: &MarkupNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Serialize a tree as a complete HTML document
pub fn to_document(root: &MarkupNode) -> String {
    format!("<!DOCTYPE html>{}", serialize(root))
}

fn write_node(out: &mut String, node: &MarkupNode) {
    out.push('<');
    out.push_str(&node.tag);
    for (name, value) in &node.attributes {
        match value {
            Some(value) => {
                // Writing into a String cannot fail
                let _ = write!(out, " {}=\"{}\"", name, escape_attr(value));
            }
            None => {
                out.push(' ');
                out.push_str(name);
            }
        }
    }
    out.push('>');

    if node.is_void() {
        return;
    }

    if let Some(text) = &node.text {
        out.push_str(&escape_text(text));
    }
    for child in &node.children {
        write_node(out, child);
    }

    out.push_str("</");
    out.push_str(&node.tag);
    out.push('>');
}

/// Escape text content
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
