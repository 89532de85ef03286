//! Unified line diff between two paragraph sequences.
//!
//! Uses the `similar` crate (Myers diff algorithm) to produce structured
//! hunks with context lines, then renders them in unified format.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each change.
pub const DEFAULT_CONTEXT: usize = 3;

/// A rendered-or-renderable difference between two projections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionDiff {
    pub from_label: String,
    pub to_label: String,
    pub hunks: Vec<DiffHunk>,
    /// Total number of lines on the original side.
    pub old_lines: usize,
    /// Total number of lines on the edited side.
    pub new_lines: usize,
}

impl ProjectionDiff {
    /// Total number of lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Added(_)))
            .count()
    }

    /// Total number of lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| matches!(l, DiffLine::Removed(_)))
            .count()
    }
}

impl fmt::Display for ProjectionDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {}", self.from_label)?;
        write!(f, "+++ {}", self.to_label)?;
        for hunk in &self.hunks {
            write!(
                f,
                "\n@@ -{} +{} @@",
                format_range(hunk.old_start, hunk.old_count),
                format_range(hunk.new_start, hunk.new_count)
            )?;
            for line in &hunk.lines {
                match line {
                    DiffLine::Context(text) => write!(f, "\n {text}")?,
                    DiffLine::Removed(text) => write!(f, "\n-{text}")?,
                    DiffLine::Added(text) => write!(f, "\n+{text}")?,
                }
            }
        }
        Ok(())
    }
}

/// `start,count` in unified notation: a single line is just `start`, and
/// an empty range names the line before it.
fn format_range(start: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", start.saturating_sub(1)),
        1 => start.to_string(),
        n => format!("{start},{n}"),
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffHunk {
    /// Line number in the original where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of original lines in this hunk.
    pub old_count: usize,
    /// Line number in the edited side where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of edited lines in this hunk.
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Compares two paragraph sequences line by line.
#[derive(Clone, Debug)]
pub struct DiffReporter {
    from_label: String,
    to_label: String,
    context: usize,
}

impl DiffReporter {
    pub fn new(from_label: impl Into<String>, to_label: impl Into<String>) -> Self {
        Self {
            from_label: from_label.into(),
            to_label: to_label.into(),
            context: DEFAULT_CONTEXT,
        }
    }

    /// Set the number of context lines around each change.
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    /// Diff `original` against `edited`, or `None` when they match.
    ///
    /// Sequences are compared as joined text, so a paragraph that itself
    /// contains a line break diffs as two lines. Empty paragraphs are kept as
    /// empty lines; any mismatch yields at least one hunk.
    pub fn compare(&self, original: &[String], edited: &[String]) -> Option<ProjectionDiff> {
        if original.join("\n") == edited.join("\n") {
            return None;
        }

        let old = split_lines(original);
        let new = split_lines(edited);
        let text_diff = TextDiff::from_slices(old.as_slice(), new.as_slice());

        let hunks = text_diff
            .grouped_ops(self.context)
            .iter()
            .filter_map(|group| {
                let (first, last) = (group.first()?, group.last()?);
                let old_range = first.old_range().start..last.old_range().end;
                let new_range = first.new_range().start..last.new_range().end;
                let lines = group
                    .iter()
                    .flat_map(|op| text_diff.iter_changes(op))
                    .map(|change| {
                        let text = change.value().to_string();
                        match change.tag() {
                            ChangeTag::Equal => DiffLine::Context(text),
                            ChangeTag::Delete => DiffLine::Removed(text),
                            ChangeTag::Insert => DiffLine::Added(text),
                        }
                    })
                    .collect();
                Some(DiffHunk {
                    old_start: old_range.start + 1,
                    old_count: old_range.len(),
                    new_start: new_range.start + 1,
                    new_count: new_range.len(),
                    lines,
                })
            })
            .collect();

        Some(ProjectionDiff {
            from_label: self.from_label.clone(),
            to_label: self.to_label.clone(),
            hunks,
            old_lines: old.len(),
            new_lines: new.len(),
        })
    }
}

/// Every paragraph split on embedded line breaks. An empty paragraph is one
/// empty line, unlike `str::lines` on the joined text.
fn split_lines(paragraphs: &[String]) -> Vec<&str> {
    paragraphs.iter().flat_map(|p| p.split('\n')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn reporter() -> DiffReporter {
        DiffReporter::new("original", "modified")
    }

    #[test]
    fn identical_sequences_no_diff() {
        let a = lines(&["one", "two"]);
        assert!(reporter().compare(&a, &a).is_none());
    }

    #[test]
    fn single_paragraph_change_renders_unified_diff() {
        let diff = reporter()
            .compare(&lines(&["Hello world."]), &lines(&["Hello there."]))
            .unwrap();
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
        assert_eq!(
            diff.to_string(),
            "--- original\n+++ modified\n@@ -1 +1 @@\n-Hello world.\n+Hello there."
        );
    }

    #[test]
    fn hunk_is_anchored_at_changed_line() {
        let old = lines(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let mut new = old.clone();
        new[6] = "X".into();

        let diff = reporter().compare(&old, &new).unwrap();
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.old_start, 4);
        assert_eq!(hunk.old_count, 7);
        assert!(hunk.lines.iter().any(|l| matches!(l, DiffLine::Context(_))));
        assert!(diff.to_string().contains("@@ -4,7 +4,7 @@"));
    }

    #[test]
    fn context_width_is_configurable() {
        let old = lines(&["a", "b", "c", "d", "e"]);
        let new = lines(&["a", "b", "X", "d", "e"]);
        let diff = reporter().with_context(0).compare(&old, &new).unwrap();
        assert!(diff.hunks[0]
            .lines
            .iter()
            .all(|l| !matches!(l, DiffLine::Context(_))));
    }

    #[test]
    fn pure_insertion_uses_empty_old_range() {
        let diff = reporter()
            .compare(&lines(&["a"]), &lines(&["a", "b"]))
            .unwrap();
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        assert!(diff.to_string().contains("@@ -1 +1,2 @@"));
    }

    #[test]
    fn empty_to_content() {
        let diff = reporter().compare(&[], &lines(&["new"])).unwrap();
        assert_eq!(diff.old_lines, 0);
        assert!(diff.to_string().contains("@@ -0,0 +1 @@"));
    }

    #[test]
    fn trailing_empty_paragraph_gets_a_hunk() {
        let diff = reporter()
            .compare(&lines(&["Hello world."]), &lines(&["Hello world.", ""]))
            .unwrap();
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.new_lines, 2);
        assert_eq!(
            diff.to_string(),
            "--- original\n+++ modified\n@@ -1 +1,2 @@\n Hello world.\n+"
        );
    }

    #[test]
    fn removed_empty_paragraph_gets_a_hunk() {
        let diff = reporter()
            .compare(&lines(&["a", "", ""]), &lines(&["a", ""]))
            .unwrap();
        assert_eq!(diff.deletions(), 1);
        assert!(diff.to_string().contains("@@"));
    }

    #[test]
    fn sequences_equal_as_text_do_not_diff() {
        let split = lines(&["a", "b"]);
        let joined = lines(&["a\nb"]);
        assert!(reporter().compare(&split, &joined).is_none());
    }
}
