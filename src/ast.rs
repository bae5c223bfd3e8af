//! Attributed Tree for Tobsterlang
//!
//! A Tobsterlang program is an XML document, so the tree mirrors XML
//! structure directly: every node has a kind (the element name), an
//! ordered attribute bag, ordered children, and an optional text payload.
//! The tree is produced once by the parser and read-only afterwards.

use std::fmt;

use crate::error::{Error, Result};

/// The closed set of node kinds the lowering engine understands.
///
/// Dispatch on kinds is exhaustive; adding a construct to the language
/// means adding a variant here and a lowering rule for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Function definition: `<Func name="f" returns="Int32" x="Int32">`
    Func,
    /// Variable declaration: `<Var name="x" type="Int32"/>`
    Var,
    /// Literal: `<Value type="Int32">5</Value>`
    Value,
    /// Write to a variable: `<Store name="x">...</Store>`
    Store,
    /// Read a variable: `<Load name="x"/>`
    Load,
    /// Address of a variable: `<Ref name="x"/>`
    Ref,
    /// Left-folded addition over two or more operands
    Add,
    /// Left-folded subtraction over two or more operands
    Sub,
    /// Return from the enclosing function
    Return,
    /// Call a user or runtime-library function: `<Call name="printf">`
    Call,
}

impl NodeKind {
    /// Maps an element name to its kind. Unknown names are left to the
    /// caller to report.
    pub fn from_tag(tag: &str) -> Option<NodeKind> {
        match tag {
            "Func" => Some(NodeKind::Func),
            "Var" => Some(NodeKind::Var),
            "Value" => Some(NodeKind::Value),
            "Store" => Some(NodeKind::Store),
            "Load" => Some(NodeKind::Load),
            "Ref" => Some(NodeKind::Ref),
            "Add" => Some(NodeKind::Add),
            "Sub" => Some(NodeKind::Sub),
            "Return" => Some(NodeKind::Return),
            "Call" => Some(NodeKind::Call),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Func => "Func",
            NodeKind::Var => "Var",
            NodeKind::Value => "Value",
            NodeKind::Store => "Store",
            NodeKind::Load => "Load",
            NodeKind::Ref => "Ref",
            NodeKind::Add => "Add",
            NodeKind::Sub => "Sub",
            NodeKind::Return => "Return",
            NodeKind::Call => "Call",
        };
        write!(f, "{}", name)
    }
}

/// One node of the attributed tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Attribute bag in document order. Order is load-bearing: a `Func`
    /// node's non-`name`/`returns` attributes are its parameter list in
    /// calling order.
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Text payload, carried verbatim from the document. Only `Value`
    /// nodes read it.
    pub text: Option<String>,
}

impl Node {
    /// Looks up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Looks up an attribute the node kind requires.
    pub fn require_attr(&self, name: &str) -> Result<&str> {
        self.attr(name).ok_or_else(|| {
            Error::malformed(self.kind.to_string(), format!("missing `{}` attribute", name))
        })
    }

    /// Text payload, or the empty string for nodes without one.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// A complete program: the `Root` element.
#[derive(Debug, Clone)]
pub struct Program {
    /// Name of the compilation unit, from `Root`'s `module` attribute.
    pub module: String,
    /// Top-level nodes, expected to be `Func` definitions.
    pub items: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_tag_covers_every_kind() {
        for tag in [
            "Func", "Var", "Value", "Store", "Load", "Ref", "Add", "Sub", "Return", "Call",
        ] {
            let kind = NodeKind::from_tag(tag).unwrap();
            assert_eq!(kind.to_string(), tag);
        }
        assert!(NodeKind::from_tag("While").is_none());
    }

    #[test]
    fn require_attr_reports_node_kind() {
        let node = Node {
            kind: NodeKind::Store,
            attrs: vec![],
            children: vec![],
            text: None,
        };
        let err = node.require_attr("name").unwrap_err();
        assert!(err.to_string().contains("Store"));
        assert!(err.to_string().contains("name"));
    }
}
