//! XML serialization and canonical indentation

use crate::xml::model::Element;

/// Serialize an element tree, including the root's tail
pub fn serialize(root: &Element) -> String {
    let mut output = String::new();
    serialize_element(root, &mut output);
    output
}

fn serialize_element(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in element.attributes.iter() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_xml(value));
        output.push('"');
    }

    if element.text.is_none() && element.children.is_empty() {
        output.push_str("/>");
    } else {
        output.push('>');
        if let Some(text) = &element.text {
            output.push_str(&escape_xml(text));
        }
        for child in &element.children {
            serialize_element(child, output);
        }
        output.push_str("</");
        output.push_str(&element.name);
        output.push('>');
    }

    if let Some(tail) = &element.tail {
        output.push_str(&escape_xml(tail));
    }
}

pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Rewrite `text`/`tail` whitespace so serialization yields one tag per
/// line, indented two spaces per depth level. Meaningful text is never
/// touched; a childless root gets no trailing tail.
pub fn indent(root: &mut Element) {
    indent_level(root, 0);
}

fn indent_level(element: &mut Element, level: usize) {
    let pad = format!("\n{}", "  ".repeat(level));

    if element.children.is_empty() {
        if level > 0 && is_blank(&element.tail) {
            element.tail = Some(pad);
        }
        return;
    }

    if is_blank(&element.text) {
        element.text = Some(format!("{pad}  "));
    }
    if is_blank(&element.tail) {
        element.tail = Some(pad.clone());
    }
    for child in &mut element.children {
        indent_level(child, level + 1);
    }
    // The last child's tail closes the parent's indentation frame.
    if let Some(last) = element.children.last_mut() {
        if is_blank(&last.tail) {
            last.tail = Some(pad);
        }
    }
}

fn is_blank(slot: &Option<String>) -> bool {
    slot.as_deref().is_none_or(|s| s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;
    use crate::Result;

    #[test]
    fn test_serialize_self_closing() -> Result<()> {
        let root = parse_str("<root><a/></root>")?;
        assert_eq!(serialize(&root), "<root><a/></root>");
        Ok(())
    }

    #[test]
    fn test_serialize_attributes_and_text() -> Result<()> {
        let root = parse_str("<root><a key=\"v\">x</a></root>")?;
        assert_eq!(serialize(&root), "<root><a key=\"v\">x</a></root>");
        Ok(())
    }

    #[test]
    fn test_serialize_escapes() -> Result<()> {
        let mut root = parse_str("<root/>")?;
        root.text = Some("a < b & c".to_string());
        root.attributes
            .insert("q".to_string(), "say \"hi\"".to_string());
        assert_eq!(
            serialize(&root),
            "<root q=\"say &quot;hi&quot;\">a &lt; b &amp; c</root>"
        );
        Ok(())
    }

    #[test]
    fn test_indent_layout() -> Result<()> {
        let mut root = parse_str("<root><a>x</a><b/></root>")?;
        indent(&mut root);
        assert_eq!(serialize(&root), "<root>\n  <a>x</a>\n  <b/>\n</root>\n");
        Ok(())
    }

    #[test]
    fn test_indent_nested() -> Result<()> {
        let mut root = parse_str("<root><a><b>x</b></a></root>")?;
        indent(&mut root);
        assert_eq!(
            serialize(&root),
            "<root>\n  <a>\n    <b>x</b>\n  </a>\n</root>\n"
        );
        Ok(())
    }

    #[test]
    fn test_indent_childless_root_gets_no_tail() -> Result<()> {
        let mut root = parse_str("<root>x</root>")?;
        indent(&mut root);
        assert_eq!(serialize(&root), "<root>x</root>");
        Ok(())
    }

    #[test]
    fn test_indent_preserves_meaningful_text() -> Result<()> {
        let mut root = parse_str("<root><a>keep me</a></root>")?;
        indent(&mut root);
        let out = serialize(&root);
        assert!(out.contains(">keep me</a>"));
        Ok(())
    }
}
