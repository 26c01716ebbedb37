//! XML element model
//!
//! Elements own their subtree, so a per-row working copy is a plain
//! `clone()` of the template root. There is no mixed content: text
//! before the first child lives in `text`, text after an element's
//! closing tag lives in that element's `tail`.

use indexmap::IndexMap;

/// XML element
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an element with no attributes, text, or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    /// Text content with surrounding whitespace stripped, empty if absent
    pub fn text_trimmed(&self) -> &str {
        self.text.as_deref().unwrap_or("").trim()
    }

    /// True when the element carries no meaningful text and no children
    pub fn is_empty_leaf(&self) -> bool {
        self.children.is_empty() && self.text_trimmed().is_empty()
    }

    /// First child matching `name`, if any
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
}
