//! Line-oriented handling of the template prolog
//!
//! The tree parser drops everything before the root element, so the
//! namespace declarations and the prolog block are recovered here by
//! scanning the template text directly, and spliced back in front of
//! each serialized body.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Error, Result};

const NS_TAG: &str = "xmlns:";

/// Namespace prefix bindings plus the verbatim declaration tags used to
/// wrap qualified mapping fragments.
#[derive(Clone, Debug, Default)]
pub struct NamespaceBindings {
    /// prefix -> URI, in source order
    pub namespaces: IndexMap<String, String>,
    /// Reconstructed declaration tags, in source order. Only tags that
    /// span more than one physical line need reconstruction; a tag that
    /// opens and closes on one line is already visible to the tree
    /// parser as the document root.
    pub declarations: Vec<String>,
}

impl NamespaceBindings {
    /// Scan a template file's text for namespace declarations
    pub fn scan(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        Ok(Self::from_lines(content.lines()))
    }

    /// Scan prefix bindings and multi-line declaration tags from lines
    pub fn from_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Self {
        let mut namespaces = IndexMap::new();
        let mut declarations = Vec::new();
        let mut open: Option<String> = None;

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.contains(NS_TAG) {
                for token in line.split_whitespace() {
                    if let Some((prefix, uri)) = parse_binding(token) {
                        // xsi is the schema-instance prefix, reserved.
                        if prefix != "xsi" {
                            namespaces.insert(prefix, uri);
                        }
                    }
                }
            }

            match open.take() {
                None => {
                    if line.starts_with('<') && line.contains(NS_TAG) && !line.ends_with('>') {
                        open = Some(line.to_string());
                    }
                }
                Some(mut acc) => {
                    acc.push(' ');
                    acc.push_str(line);
                    if line.ends_with('>') {
                        declarations.push(acc);
                    } else {
                        open = Some(acc);
                    }
                }
            }
        }

        Self {
            namespaces,
            declarations,
        }
    }
}

/// Extract `(prefix, uri)` from a token of the form `xmlns:prefix="uri"`
fn parse_binding(token: &str) -> Option<(String, String)> {
    let start = token.find(NS_TAG)?;
    let rest = token.get(start + NS_TAG.len()..)?;
    let eq = rest.find('=')?;
    let prefix = rest.get(..eq)?;
    let after = rest.get(eq + 1..)?;
    let quote = after.chars().next().filter(|c| matches!(c, '"' | '\''))?;
    let inner = after.get(1..)?;
    let end = inner.find(quote)?;
    let uri = inner.get(..end)?;
    if prefix.is_empty() {
        return None;
    }
    Some((prefix.to_string(), uri.to_string()))
}

/// Reassemble a final document: the template's prolog lines, then the
/// serialized body starting at the first line carrying the pivot tag.
///
/// The pivot tag is the first three characters of the first template
/// line that is neither a declaration nor a comment; it marks where the
/// template's own body begins, and locates the same point in `body`.
pub fn splice_header(template: &Path, body: &Path, out: &Path) -> Result<()> {
    let header = fs::read_to_string(template).map_err(|e| Error::io(template, &e))?;
    let body_text = fs::read_to_string(body).map_err(|e| Error::io(body, &e))?;

    let mut output = String::new();
    let mut pivot = String::new();
    let mut decl_start = false;
    let mut decl_stop = false;

    for line in header.lines() {
        let line = line.trim();
        if !decl_start {
            decl_start = line.contains("<!") || line.contains("<?");
        }
        if !decl_stop {
            decl_stop = line.contains("-->") || line.contains("?>");
        }

        // Neither declaration nor comment and not empty: the body starts.
        if !decl_start && !decl_stop && !line.is_empty() {
            pivot = line.chars().take(3).collect();
            break;
        }
        if !line.is_empty() {
            output.push_str(line);
            output.push('\n');
            if decl_start && decl_stop {
                decl_start = false;
                decl_stop = false;
            }
        }
    }

    let mut started = false;
    for line in body_text.lines() {
        if !started && line.contains(&pivot) {
            started = true;
        }
        if started {
            output.push_str(line);
            output.push('\n');
        }
    }

    fs::write(out, output).map_err(|e| Error::io(out, &e))
}
