//! Reversion of one author's tracked changes.
//!
//! Resolving for author A rejects A's insertions (the marker and its whole
//! subtree are dropped) and restores A's deletions (the marker is unwrapped
//! in place and its deleted text becomes live text again). Markers of every
//! other author are copied through untouched.
//!
//! The input tree is never mutated. Each pass reads a parent's children as
//! an immutable slice and builds a fresh child list for the output tree, so
//! splicing never disturbs the sequence being iterated.

use redline_tree::{Document, Node, NodeKind, Vocabulary};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Work done by a resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveStats {
    /// Insertion markers dropped together with their content.
    pub insertions_removed: usize,
    /// Deletion markers unwrapped.
    pub deletions_restored: usize,
    /// Top-down passes run before no target marker remained.
    pub passes: usize,
}

/// Number of markers attributed to one author.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCount {
    pub insertions: usize,
    pub deletions: usize,
}

impl MarkerCount {
    pub fn total(&self) -> usize {
        self.insertions + self.deletions
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Undoes the tracked changes of a single author.
///
/// Author matching is an exact, case-sensitive string comparison. A marker
/// with no author attribute never matches.
#[derive(Clone, Debug)]
pub struct TrackedChangeResolver {
    vocabulary: Vocabulary,
    author: String,
}

impl TrackedChangeResolver {
    /// Resolver for `author` over the WordprocessingML vocabulary.
    pub fn new(author: impl Into<String>) -> Self {
        Self::with_vocabulary(author, Vocabulary::default())
    }

    pub fn with_vocabulary(author: impl Into<String>, vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            author: author.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Return a new document with the author's changes undone.
    pub fn resolve(&self, doc: &Document) -> Document {
        self.resolve_with_stats(doc).0
    }

    /// Like [`Self::resolve`], also reporting what was removed and restored.
    pub fn resolve_with_stats(&self, doc: &Document) -> (Document, ResolveStats) {
        let mut stats = ResolveStats::default();
        let mut current = doc.root.clone();
        while !self.count_markers(&current).is_empty() {
            current = self.rebuild(&current, &mut stats);
            stats.passes += 1;
        }
        debug!(
            author = %self.author,
            insertions_removed = stats.insertions_removed,
            deletions_restored = stats.deletions_restored,
            passes = stats.passes,
            "resolved tracked changes"
        );
        (Document::new(current), stats)
    }

    /// Count the author's markers reachable from the document root.
    pub fn target_markers(&self, doc: &Document) -> MarkerCount {
        self.count_markers(&doc.root)
    }

    fn count_markers(&self, root: &Node) -> MarkerCount {
        let mut count = MarkerCount::default();
        for node in root.descendants() {
            match self.vocabulary.classify(node) {
                NodeKind::Insertion if self.is_target(node) => count.insertions += 1,
                NodeKind::Deletion if self.is_target(node) => count.deletions += 1,
                NodeKind::Insertion
                | NodeKind::Deletion
                | NodeKind::Paragraph
                | NodeKind::Text
                | NodeKind::DeletedText
                | NodeKind::Other(_) => {}
            }
        }
        count
    }

    fn is_target(&self, marker: &Node) -> bool {
        self.vocabulary.author_of(marker) == Some(self.author.as_str())
    }

    fn rebuild(&self, node: &Node, stats: &mut ResolveStats) -> Node {
        let mut out = node.shallow_clone();
        out.children = self.rebuild_children(&node.children, stats);
        out
    }

    fn rebuild_children(&self, children: &[Node], stats: &mut ResolveStats) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            match self.vocabulary.classify(child) {
                NodeKind::Insertion if self.is_target(child) => {
                    stats.insertions_removed += 1;
                }
                NodeKind::Deletion if self.is_target(child) => {
                    stats.deletions_restored += 1;
                    // Restored content may hold further markers, so it is
                    // rebuilt like any other run of siblings.
                    let restored: Vec<Node> =
                        child.children.iter().map(|c| self.restore_text(c)).collect();
                    out.extend(self.rebuild_children(&restored, stats));
                }
                NodeKind::Insertion
                | NodeKind::Deletion
                | NodeKind::Paragraph
                | NodeKind::Text
                | NodeKind::DeletedText
                | NodeKind::Other(_) => out.push(self.rebuild(child, stats)),
            }
        }
        out
    }

    /// Copy of a subtree with every deleted-text node renamed to ordinary text.
    fn restore_text(&self, node: &Node) -> Node {
        let mut out = node.shallow_clone();
        self.vocabulary.restore_text_name(&mut out.name);
        out.children = node.children.iter().map(|c| self.restore_text(c)).collect();
        out
    }
}
