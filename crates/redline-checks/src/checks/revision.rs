use redline_diff::{DiffReporter, ProjectionDiff};
use redline_revision::{TextProjector, TrackedChangeResolver};
use redline_tree::Document;
use tracing::debug;

use crate::check::{Check, CheckContext, CheckOutcome, Location, Violation, ViolationKind};
use crate::config::ValidatorConfig;
use crate::error::CheckError;

const MISMATCH_HELP: &str = "Document text doesn't match after removing the author's tracked changes

Likely causes:
  1. Modified text inside another author's <w:ins> or <w:del> tags
  2. Made edits without proper tracked changes
  3. Didn't nest <w:del> inside <w:ins> when deleting another's insertion

Fix: Use nested deletions:
  <w:ins w:author=\"Other\"><w:del w:author=\"<author>\">...</w:del></w:ins>";

/// Proves that the author's edits are fully expressed as tracked changes:
/// once the author's insertions and deletions are undone in both the edited
/// and the original document, their text projections must be identical.
///
/// There is no shortcut when the edited document has no markers by the
/// author: untracked edits are exactly what this check must catch.
pub struct RevisionCheck;

impl RevisionCheck {
    /// Revert the configured author in both trees, project, and diff.
    /// Returns `None` when the projections match.
    pub fn compare(
        edited: &Document,
        original: &Document,
        config: &ValidatorConfig,
    ) -> Option<ProjectionDiff> {
        let resolver =
            TrackedChangeResolver::with_vocabulary(&config.author, config.vocabulary.clone());
        let projector = TextProjector::new(config.vocabulary.clone());

        let edited = projector.project(&resolver.resolve(edited));
        let original = projector.project(&resolver.resolve(original));

        let part = config.main_part_name();
        let suffix = format!("(text content after reverting {}'s changes)", config.author);
        DiffReporter::new(
            format!("original/{part} {suffix}"),
            format!("modified/{part} {suffix}"),
        )
        .with_context(config.diff_context)
        .compare(&original.paragraphs, &edited.paragraphs)
    }
}

impl Check for RevisionCheck {
    fn name(&self) -> &str {
        "revision"
    }

    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError> {
        let edited = context.load_edited()?;
        let original = context.load_original()?;
        let config = &context.config;

        let markers = TrackedChangeResolver::with_vocabulary(&config.author, config.vocabulary.clone())
            .target_markers(&edited);
        debug!(
            author = %config.author,
            insertions = markers.insertions,
            deletions = markers.deletions,
            "comparing after reversion"
        );
        let note = format!(
            "{} insertion(s) and {} deletion(s) by {}",
            markers.insertions, markers.deletions, config.author
        );

        match Self::compare(&edited, &original, config) {
            None => Ok(CheckOutcome::pass().note(note)),
            Some(diff) => {
                let message = MISMATCH_HELP.replace("<author>", &config.author);
                let mut outcome = CheckOutcome::with_violations(vec![Violation {
                    kind: ViolationKind::ComparisonMismatch,
                    location: Location::part(&config.main_part),
                    message,
                }])
                .note(note);
                outcome.diff = Some(diff.to_string());
                Ok(outcome)
            }
        }
    }
}
