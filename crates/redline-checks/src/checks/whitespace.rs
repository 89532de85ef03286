use redline_tree::{Document, NodeKind};

use crate::check::{text_preview, Check, CheckContext, CheckOutcome, Location, Violation};
use crate::config::ValidatorConfig;
use crate::error::CheckError;

/// Returns `true` if `text` starts or ends with a whitespace character.
pub fn has_boundary_whitespace(text: &str) -> bool {
    let starts = text.chars().next().is_some_and(char::is_whitespace);
    let ends = text.chars().next_back().is_some_and(char::is_whitespace);
    starts || ends
}

/// Flags ordinary text nodes with leading or trailing whitespace that do not
/// declare `xml:space="preserve"`; consumers would otherwise collapse it.
pub struct WhitespaceIntegrityCheck;

impl WhitespaceIntegrityCheck {
    /// Scan a parsed tree and return every violation found.
    pub fn scan(doc: &Document, config: &ValidatorConfig) -> Vec<Violation> {
        let vocab = &config.vocabulary;
        let mut violations = Vec::new();

        doc.root.walk(|node, _ancestors, path| match vocab.classify(node) {
            NodeKind::Text => {
                let Some(text) = node.text.as_deref() else {
                    return;
                };
                if has_boundary_whitespace(text) && !vocab.preserves_space(node) {
                    violations.push(Violation::structural(
                        Location::at(&config.main_part, node.line, path),
                        format!(
                            "{} element with whitespace missing xml:space='preserve': {}",
                            node.name.qualified(),
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

impl Check for WhitespaceIntegrityCheck {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError> {
        let doc = context.load_edited()?;
        Ok(CheckOutcome::with_violations(Self::scan(
            &doc,
            &context.config,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn scan(body: &str) -> Vec<Violation> {
        let xml = format!("<w:document {W}><w:body><w:p><w:r>{body}</w:r></w:p></w:body></w:document>");
        let doc = Document::parse(&xml).unwrap();
        WhitespaceIntegrityCheck::scan(&doc, &ValidatorConfig::default())
    }

    #[test]
    fn boundary_predicate() {
        assert!(has_boundary_whitespace(" hello"));
        assert!(has_boundary_whitespace("hello "));
        assert!(has_boundary_whitespace("\thello"));
        assert!(has_boundary_whitespace("hello\u{00A0}"));
        assert!(!has_boundary_whitespace("hello"));
        assert!(!has_boundary_whitespace("hello world"));
        assert!(!has_boundary_whitespace(""));
    }

    #[test]
    fn leading_space_without_preserve_is_flagged() {
        let violations = scan("<w:t> hello</w:t>");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("\" hello\""));
        assert!(violations[0].message.starts_with("w:t element with whitespace"));
    }

    #[test]
    fn preserve_attribute_satisfies_check() {
        assert!(scan(r#"<w:t xml:space="preserve"> hello </w:t>"#).is_empty());
    }

    #[test]
    fn other_space_values_do_not_count() {
        assert_eq!(scan(r#"<w:t xml:space="default">hello </w:t>"#).len(), 1);
    }

    #[test]
    fn no_boundary_whitespace_never_flagged() {
        assert!(scan("<w:t>hello</w:t>").is_empty());
        assert!(scan(r#"<w:t xml:space="preserve">hello</w:t>"#).is_empty());
        assert!(scan("<w:t>hello world</w:t>").is_empty());
    }

    #[test]
    fn deleted_text_is_not_scanned() {
        assert!(scan("<w:delText> gone </w:delText>").is_empty());
    }

    #[test]
    fn reports_all_occurrences() {
        assert_eq!(scan("<w:t> a</w:t><w:t>b </w:t><w:t>c</w:t>").len(), 2);
    }
}
