use redline_tree::{Document, NodeKind};

use crate::check::{text_preview, Check, CheckContext, CheckOutcome, Location, Violation};
use crate::config::ValidatorConfig;
use crate::error::CheckError;

/// Flags ordinary text nodes that sit, at any depth, inside a deletion
/// marker. Deleted content must use the deleted-text tag instead.
///
/// No authorship filter applies: every deletion marker counts.
pub struct DeletionIntegrityCheck;

impl DeletionIntegrityCheck {
    /// Scan a parsed tree and return every violation found.
    pub fn scan(doc: &Document, config: &ValidatorConfig) -> Vec<Violation> {
        let vocab = &config.vocabulary;
        let mut violations = Vec::new();

        doc.root.walk(|node, ancestors, path| match vocab.classify(node) {
            NodeKind::Text => {
                let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) else {
                    return;
                };
                let deletion = ancestors
                    .iter()
                    .find(|a| vocab.classify(a) == NodeKind::Deletion);
                if let Some(deletion) = deletion {
                    violations.push(Violation::structural(
                        Location::at(&config.main_part, node.line, path),
                        format!(
                            "<{}> found within <{}>: {}",
                            node.name.qualified(),
                            deletion.name.qualified(),
                            text_preview(text, config.preview_len)
                        ),
                    ));
                }
            }
            NodeKind::Paragraph
            | NodeKind::Insertion
            | NodeKind::Deletion
            | NodeKind::DeletedText
            | NodeKind::Other(_) => {}
        });

        violations
    }
}

impl Check for DeletionIntegrityCheck {
    fn name(&self) -> &str {
        "deletions"
    }

    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError> {
        let doc = context.load_edited()?;
        Ok(CheckOutcome::with_violations(Self::scan(
            &doc,
            &context.config,
        )))
    }
}
