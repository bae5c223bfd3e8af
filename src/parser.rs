//! XML Front-End
//!
//! Reads a Tobsterlang document into the attributed tree. The root element
//! must be `Root` with a `module` attribute; everything below it maps
//! one element to one [`Node`]. Attribute order and text payloads are
//! preserved exactly as written, since both carry meaning downstream.

use crate::ast::{Node, NodeKind, Program};
use crate::error::{Error, Result};

/// Parses a program document.
pub fn parse(source: &str) -> Result<Program> {
    let doc = roxmltree::Document::parse(source)?;
    let root = doc.root_element();

    if root.tag_name().name() != "Root" {
        return Err(Error::malformed(
            root.tag_name().name(),
            "expected `Root` as the document element",
        ));
    }

    let module = root
        .attribute("module")
        .ok_or_else(|| Error::malformed("Root", "missing `module` attribute"))?
        .to_string();

    let items = root
        .children()
        .filter(|child| child.is_element())
        .map(convert)
        .collect::<Result<Vec<_>>>()?;

    Ok(Program { module, items })
}

fn convert(element: roxmltree::Node) -> Result<Node> {
    let tag = element.tag_name().name();
    let kind = NodeKind::from_tag(tag)
        .ok_or_else(|| Error::malformed(tag, "unknown node kind"))?;

    let attrs = element
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let children = element
        .children()
        .filter(|child| child.is_element())
        .map(convert)
        .collect::<Result<Vec<_>>>()?;

    // First text child, verbatim. Leaf payloads like `<Value>5</Value>`
    // land here; surrounding-whitespace text in container elements is
    // never read by the lowering rules.
    let text = element
        .children()
        .find(|child| child.is_text())
        .and_then(|child| child.text())
        .map(str::to_string);

    Ok(Node {
        kind,
        attrs,
        children,
        text,
    })
}
