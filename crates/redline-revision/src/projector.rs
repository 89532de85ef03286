//! Paragraph-ordered plain-text projection of a tree.

use redline_tree::{Document, Node, NodeKind, Vocabulary};
use serde::{Deserialize, Serialize};

/// Separator placed between paragraphs by [`Projection::to_text`].
pub const PARAGRAPH_SEPARATOR: &str = "\n";

/// The text of a document, one entry per paragraph in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub paragraphs: Vec<String>,
}

impl Projection {
    /// Paragraphs joined by [`PARAGRAPH_SEPARATOR`].
    pub fn to_text(&self) -> String {
        self.paragraphs.join(PARAGRAPH_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// Reads only ordinary text nodes. Text still wrapped in a deleted-text tag
/// is logically absent and never appears in a projection.
#[derive(Clone, Debug, Default)]
pub struct TextProjector {
    vocabulary: Vocabulary,
}

impl TextProjector {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Project every paragraph below the root, in document order.
    ///
    /// A paragraph nested inside another (e.g. in a text box) is listed on
    /// its own and also contributes to the enclosing paragraph's text.
    pub fn project(&self, doc: &Document) -> Projection {
        let paragraphs = doc
            .root
            .descendants()
            .filter(|node| self.vocabulary.classify(node) == NodeKind::Paragraph)
            .map(|p| self.paragraph_text(p))
            .collect();
        Projection { paragraphs }
    }

    /// Number of paragraphs below the root.
    pub fn count_paragraphs(&self, doc: &Document) -> usize {
        doc.root
            .descendants()
            .filter(|node| self.vocabulary.classify(node) == NodeKind::Paragraph)
            .count()
    }

    fn paragraph_text(&self, paragraph: &Node) -> String {
        let mut text = String::new();
        for node in paragraph.descendants() {
            match self.vocabulary.classify(node) {
                NodeKind::Text => {
                    if let Some(content) = &node.text {
                        text.push_str(content);
                    }
                }
                NodeKind::DeletedText
                | NodeKind::Paragraph
                | NodeKind::Insertion
                | NodeKind::Deletion
                | NodeKind::Other(_) => {}
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn parse(body: &str) -> Document {
        Document::parse(&format!("<w:document {W}><w:body>{body}</w:body></w:document>")).unwrap()
    }

    #[test]
    fn concatenates_runs_per_paragraph() {
        let doc = parse(
            "<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:t>world.</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Second</w:t></w:r></w:p>",
        );
        let projection = TextProjector::default().project(&doc);
        assert_eq!(projection.paragraphs, vec!["Hello world.", "Second"]);
        assert_eq!(projection.to_text(), "Hello world.\nSecond");
    }

    #[test]
    fn deleted_text_is_excluded() {
        let doc = parse(
            r#"<w:p><w:r><w:t>keep</w:t></w:r><w:del w:author="B"><w:r><w:delText>drop</w:delText></w:r></w:del></w:p>"#,
        );
        let projection = TextProjector::default().project(&doc);
        assert_eq!(projection.paragraphs, vec!["keep"]);
    }

    #[test]
    fn inserted_text_is_included() {
        let doc = parse(r#"<w:p><w:ins w:author="B"><w:r><w:t>added</w:t></w:r></w:ins></w:p>"#);
        assert_eq!(TextProjector::default().project(&doc).paragraphs, vec!["added"]);
    }

    #[test]
    fn empty_paragraphs_are_kept() {
        let doc = parse("<w:p/><w:p><w:r><w:t>x</w:t></w:r></w:p><w:p/>");
        let projection = TextProjector::default().project(&doc);
        assert_eq!(projection.paragraphs, vec!["", "x", ""]);
        assert_eq!(TextProjector::default().count_paragraphs(&doc), 3);
    }

    #[test]
    fn text_outside_paragraphs_is_ignored() {
        let doc = parse("<w:r><w:t>stray</w:t></w:r>");
        assert!(TextProjector::default().project(&doc).is_empty());
    }

    #[test]
    fn nested_paragraph_listed_separately() {
        let doc = parse(
            "<w:p><w:r><w:t>outer </w:t><w:pict><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:pict></w:r></w:p>",
        );
        let projection = TextProjector::default().project(&doc);
        assert_eq!(projection.paragraphs, vec!["outer inner", "inner"]);
    }
}
