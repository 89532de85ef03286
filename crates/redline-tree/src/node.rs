//! The element tree: [`Node`] and its owning [`Document`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TreeResult;
use crate::name::{Attribute, QName};

/// One element of a parsed document part.
///
/// `text` holds the character data directly inside the element. Whitespace
/// that only separates child elements is not recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    pub text: Option<String>,
    /// 1-based source line of the start tag; 0 for nodes built in code.
    pub line: usize,
}

impl Node {
    /// Create an empty element.
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            line: 0,
        }
    }

    /// Builder: append an attribute.
    pub fn with_attr(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set the element's text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Value of the attribute `local` in `namespace`, if present.
    pub fn attr(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.is(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Copy of this element without its children.
    pub fn shallow_clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
            text: self.text.clone(),
            line: self.line,
        }
    }

    /// All descendants in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// One step of an element path: `w:p[2]` for the second `w:p` sibling.
    pub fn path_segment(&self, index: usize) -> String {
        format!("{}[{index}]", self.name.qualified())
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.descendants().count()
    }

    /// Visit this node and every descendant in document order.
    ///
    /// The callback receives the node, its ancestors (outermost first), and a
    /// path such as `/w:document/w:body/w:p[2]/w:r[1]`. Sibling indices are
    /// 1-based and counted among siblings with the same name.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&Node, &[&Node], &str),
    {
        let mut ancestors = Vec::new();
        let path = format!("/{}", self.name.qualified());
        walk_inner(self, &mut ancestors, &path, &mut visit);
    }
}

fn walk_inner<'a, F>(node: &'a Node, ancestors: &mut Vec<&'a Node>, path: &str, visit: &mut F)
where
    F: FnMut(&Node, &[&Node], &str),
{
    visit(node, ancestors.as_slice(), path);
    ancestors.push(node);
    let mut seen: HashMap<&QName, usize> = HashMap::new();
    for child in &node.children {
        let index = seen.entry(&child.name).or_insert(0);
        *index += 1;
        let child_path = format!("{path}/{}", child.path_segment(*index));
        walk_inner(child, ancestors, &child_path, visit);
    }
    ancestors.pop();
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed document part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// Parse a document part from XML text.
    pub fn parse(xml: &str) -> TreeResult<Self> {
        crate::reader::parse(xml)
    }

    /// Serialize the tree back to XML with a standalone declaration.
    pub fn to_xml(&self) -> TreeResult<String> {
        crate::writer::write(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:test";

    fn el(local: &str) -> Node {
        Node::new(QName::prefixed(NS, "w", local))
    }

    fn sample() -> Node {
        el("body")
            .with_child(el("p").with_child(el("r").with_child(el("t").with_text("a"))))
            .with_child(el("p").with_child(el("t").with_text("b")))
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = sample();
        let locals: Vec<&str> = root.descendants().map(|n| n.name.local.as_str()).collect();
        assert_eq!(locals, vec!["p", "r", "t", "p", "t"]);
        assert_eq!(root.subtree_len(), 6);
    }

    #[test]
    fn walk_reports_paths_and_ancestors() {
        let root = sample();
        let mut seen = Vec::new();
        root.walk(|node, ancestors, path| {
            if node.name.local == "t" {
                seen.push((path.to_string(), ancestors.len()));
            }
        });
        assert_eq!(
            seen,
            vec![
                ("/w:body/w:p[1]/w:r[1]/w:t[1]".to_string(), 3),
                ("/w:body/w:p[2]/w:t[1]".to_string(), 2),
            ]
        );
    }

    #[test]
    fn attr_lookup_by_namespace() {
        let node = el("ins").with_attr(QName::prefixed(NS, "w", "author"), "Alice");
        assert_eq!(node.attr(NS, "author"), Some("Alice"));
        assert_eq!(node.attr("urn:other", "author"), None);
    }

    #[test]
    fn path_segment_uses_qualified_name() {
        assert_eq!(el("p").path_segment(2), "w:p[2]");
    }

    #[test]
    fn shallow_clone_drops_children() {
        let root = sample();
        let copy = root.shallow_clone();
        assert!(copy.children.is_empty());
        assert_eq!(copy.name, root.name);
    }
}
