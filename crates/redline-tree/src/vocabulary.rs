//! Tag vocabulary: which names mean paragraph, text, and tracked change.

use serde::{Deserialize, Serialize};

use crate::name::{QName, XML_NAMESPACE};
use crate::node::Node;

/// WordprocessingML main namespace.
pub const WORDPROCESSING_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// The role a node plays in tracked-change processing.
///
/// Every consumer matches on this exhaustively, so a new kind cannot be
/// silently ignored by one of the checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Paragraph,
    Insertion,
    Deletion,
    /// Ordinary live text (`w:t`).
    Text,
    /// Text logically marked absent (`w:delText`).
    DeletedText,
    Other(&'a QName),
}

/// Local names of the tracked-change vocabulary within one namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub namespace: String,
    pub paragraph: String,
    pub text: String,
    pub deleted_text: String,
    pub insertion: String,
    pub deletion: String,
    pub author: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::wordprocessing()
    }
}

impl Vocabulary {
    /// The WordprocessingML vocabulary (`w:p`, `w:t`, `w:delText`, `w:ins`, `w:del`).
    pub fn wordprocessing() -> Self {
        Self {
            namespace: WORDPROCESSING_NAMESPACE.into(),
            paragraph: "p".into(),
            text: "t".into(),
            deleted_text: "delText".into(),
            insertion: "ins".into(),
            deletion: "del".into(),
            author: "author".into(),
        }
    }

    /// Classify a node by its name.
    pub fn classify<'a>(&self, node: &'a Node) -> NodeKind<'a> {
        let name = &node.name;
        if name.namespace.as_deref() != Some(self.namespace.as_str()) {
            return NodeKind::Other(name);
        }
        let local = name.local.as_str();
        if local == self.paragraph {
            NodeKind::Paragraph
        } else if local == self.text {
            NodeKind::Text
        } else if local == self.deleted_text {
            NodeKind::DeletedText
        } else if local == self.insertion {
            NodeKind::Insertion
        } else if local == self.deletion {
            NodeKind::Deletion
        } else {
            NodeKind::Other(name)
        }
    }

    /// The author attribute of a tracked-change marker, if any.
    pub fn author_of<'a>(&self, node: &'a Node) -> Option<&'a str> {
        node.attr(&self.namespace, &self.author)
    }

    /// Returns `true` if the node carries `xml:space="preserve"`.
    pub fn preserves_space(&self, node: &Node) -> bool {
        node.attr(XML_NAMESPACE, "space") == Some("preserve")
    }

    /// Rename a deleted-text node to ordinary text, keeping its prefix.
    pub fn restore_text_name(&self, name: &mut QName) {
        if name.is(&self.namespace, &self.deleted_text) {
            name.local = self.text.clone();
        }
    }
}
