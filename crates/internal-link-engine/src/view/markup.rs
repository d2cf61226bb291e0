//! Reading and writing the XHTML-like markup of the persisted form.
//!
//! Parsing goes through `roxmltree`, so the input must be well-formed XML
//! once wrapped in a single root element. Serialisation escapes with
//! `html-escape` and writes attributes in sorted order, which keeps output
//! stable for identical trees.

use crate::view::{ElementKind, ViewElement, ViewNodeData, ViewNodeId, ViewTree, ViewWriter};

/// Elements that never have children in the persisted form.
const VOID_ELEMENTS: &[&str] = &["br"];

/// Serialise the children of the root.
pub fn stringify(tree: &ViewTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        write_node(tree, child, &mut out);
    }
    out
}

/// Serialise one node including its own tag.
pub fn stringify_node(tree: &ViewTree, id: ViewNodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &ViewTree, id: ViewNodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.data {
        ViewNodeData::Root => {
            for &child in node.children() {
                write_node(tree, child, out);
            }
        }
        ViewNodeData::Text(text) => out.push_str(&html_escape::encode_text(text)),
        ViewNodeData::Element(element) => {
            write_open_tag(element, out);
            if matches!(element.kind, ElementKind::Empty | ElementKind::Ui) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for &child in node.children() {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

fn write_open_tag(element: &ViewElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        write_attribute(key, value, out);
    }
    if !element.classes.is_empty() {
        let classes: Vec<&str> = element.classes.iter().map(String::as_str).collect();
        write_attribute("class", &classes.join(" "), out);
    }
}

fn write_attribute(key: &str, value: &str, out: &mut String) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(&html_escape::encode_double_quoted_attribute(value));
    out.push('"');
}

/// Parse markup into a fresh view tree.
///
/// Element kinds are not known at this stage: void elements become
/// [`ElementKind::Empty`], everything else [`ElementKind::Container`].
/// Upcasting matches on names and attributes only. Whitespace-only text
/// directly under the root is dropped.
pub fn parse(markup: &str) -> Result<ViewTree, roxmltree::Error> {
    let wrapped = format!("<root>{markup}</root>");
    let document = roxmltree::Document::parse(&wrapped)?;

    let mut tree = ViewTree::new();
    let root = tree.root();
    tree.change(|writer| {
        for child in document.root_element().children() {
            if child.is_text() && child.text().is_some_and(|t| t.trim().is_empty()) {
                continue;
            }
            append_xml_node(writer, root, child);
        }
    });
    Ok(tree)
}

fn append_xml_node(writer: &mut ViewWriter<'_>, parent: ViewNodeId, node: roxmltree::Node<'_, '_>) {
    if node.is_text() {
        if let Some(text) = node.text() {
            writer.append_text(parent, text);
        }
        return;
    }
    if !node.is_element() {
        return;
    }

    let name = node.tag_name().name();
    let mut element = if VOID_ELEMENTS.contains(&name) {
        ViewElement::empty(name)
    } else {
        ViewElement::container(name)
    };
    for attribute in node.attributes() {
        if attribute.name() == "class" {
            element.classes.extend(
                attribute
                    .value()
                    .split_whitespace()
                    .map(str::to_string),
            );
        } else {
            element = element.with_attribute(attribute.name(), attribute.value());
        }
    }

    let id = writer.append_element(parent, element);
    for child in node.children() {
        append_xml_node(writer, id, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::WrapperKind;

    #[test]
    fn test_parse_and_stringify_round_trip() {
        let markup = r#"<p>foo <internallink internallinkid="42">bar</internallink><br/>baz</p>"#;
        let tree = parse(markup).unwrap();
        assert_eq!(stringify(&tree), markup);
    }

    #[test]
    fn test_parse_marks_void_elements_empty() {
        let tree = parse("<p>a<br/>b</p>").unwrap();
        let paragraph = tree.children(tree.root())[0];
        let br = tree.children(paragraph)[1];
        assert_eq!(tree.element(br).unwrap().kind, ElementKind::Empty);
        assert_eq!(tree.offset_size(paragraph), 3);
    }

    #[test]
    fn test_parse_skips_whitespace_between_blocks() {
        let tree = parse("<p>a</p>\n  <p>b</p>\n").unwrap();
        assert_eq!(tree.children(tree.root()).len(), 2);
    }

    #[test]
    fn test_parse_reads_classes() {
        let tree = parse(r#"<p class="b a">x</p>"#).unwrap();
        let paragraph = tree.children(tree.root())[0];
        assert!(tree.element(paragraph).unwrap().has_class("a"));
        assert_eq!(stringify(&tree), r#"<p class="a b">x</p>"#);
    }

    #[test]
    fn test_parse_rejects_malformed_markup() {
        assert!(parse("<p>unclosed").is_err());
    }

    #[test]
    fn test_stringify_escapes() {
        let mut tree = ViewTree::new();
        let root = tree.root();
        tree.change(|writer| {
            let link = writer.append_element(
                root,
                ViewElement::attribute("internallink", WrapperKind::InternalLink, 5)
                    .with_attribute("internallinkid", "a\"b&c"),
            );
            writer.append_text(link, "1 < 2");
        });

        assert_eq!(
            stringify(&tree),
            r#"<internallink internallinkid="a&quot;b&amp;c">1 &lt; 2</internallink>"#
        );
    }
}
