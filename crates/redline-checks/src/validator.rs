use std::fmt;
use std::time::{Duration, Instant};

use redline_revision::TextProjector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::check::{Check, CheckContext, CheckOutcome, CheckResult, CheckState};
use crate::checks::{
    DeletionIntegrityCheck, RevisionCheck, SchemaCheck, SchemaValidator, WellFormednessCheck,
    WhitespaceIntegrityCheck,
};

// ---------------------------------------------------------------------------
// ParagraphDelta
// ---------------------------------------------------------------------------

/// Paragraph counts of the original and edited main parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphDelta {
    pub original: usize,
    pub edited: usize,
}

impl ParagraphDelta {
    pub fn change(&self) -> i64 {
        self.edited as i64 - self.original as i64
    }
}

impl fmt::Display for ParagraphDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Paragraphs: {} \u{2192} {} ({:+})",
            self.original,
            self.edited,
            self.change()
        )
    }
}

// ---------------------------------------------------------------------------
// ValidationReport
// ---------------------------------------------------------------------------

/// Aggregate outcome of a validation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Logical AND of every check's result.
    pub passed: bool,
    pub author: String,
    /// Per-check results in pipeline order.
    pub results: Vec<CheckResult>,
    /// Absent when either side could not be parsed.
    pub paragraphs: Option<ParagraphDelta>,
    pub elapsed: Duration,
}

impl ValidationReport {
    /// Results of the checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    /// Result of the check named `name`, if it ran.
    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check_name == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Runs a pipeline of checks over one edited document.
///
/// Every check runs regardless of earlier failures. A check that errors is
/// recorded as failed with the error as its single violation.
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::with_default_checks()
    }
}

impl Validator {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Well-formedness -> whitespace -> deletions -> revision.
    pub fn with_default_checks() -> Self {
        let mut validator = Self::new();
        validator.add_check(Box::new(WellFormednessCheck));
        validator.add_check(Box::new(WhitespaceIntegrityCheck));
        validator.add_check(Box::new(DeletionIntegrityCheck));
        validator.add_check(Box::new(RevisionCheck));
        validator
    }

    /// The default pipeline with a schema check after well-formedness.
    pub fn with_schema(schema: Box<dyn SchemaValidator>) -> Self {
        let mut validator = Self::with_default_checks();
        validator
            .checks
            .insert(1, Box::new(SchemaCheck::new(schema)));
        validator
    }

    /// Append a check to the end of the pipeline.
    pub fn add_check(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    pub fn run(&self, context: &CheckContext) -> ValidationReport {
        self.run_observed(context, |name, state| {
            debug!(check = name, state = ?state, "check state changed");
        })
    }

    /// Like [`Self::run`], reporting each state transition to `observe`.
    /// Every check is reported `Pending` before the first one starts, then
    /// each moves to `Running` and `Completed` in pipeline order.
    pub fn run_observed<F>(&self, context: &CheckContext, mut observe: F) -> ValidationReport
    where
        F: FnMut(&str, CheckState),
    {
        let run_start = Instant::now();
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            observe(check.name(), CheckState::Pending);
        }

        for check in &self.checks {
            let name = check.name();
            observe(name, CheckState::Running);

            let check_start = Instant::now();
            let outcome = match check.run(context) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(check = name, error = %e, "check aborted");
                    CheckOutcome::with_violations(vec![e.to_violation(context.part())])
                }
            };
            let result = CheckResult::completed(name, outcome, check_start.elapsed());
            debug!(check = name, violations = result.violations.len(), "check finished");
            observe(name, result.state);
            results.push(result);
        }

        let passed = results.iter().all(|r| r.passed);
        let report = ValidationReport {
            passed,
            author: context.author().to_string(),
            results,
            paragraphs: paragraph_delta(context),
            elapsed: run_start.elapsed(),
        };
        info!(
            passed,
            checks = report.results.len(),
            failed = report.failures().count(),
            "validation finished"
        );
        report
    }
}

fn paragraph_delta(context: &CheckContext) -> Option<ParagraphDelta> {
    let projector = TextProjector::new(context.config.vocabulary.clone());
    let edited = context.load_edited().ok()?;
    let original = context.load_original().ok()?;
    Some(ParagraphDelta {
        original: projector.count_paragraphs(&original),
        edited: projector.count_paragraphs(&edited),
    })
}

#[cfg(test)]
mod tests {
    use redline_package::PartSource;
    use redline_tree::Document;

    use super::*;
    use crate::check::ViolationKind;
    use crate::checks::SchemaVerdict;
    use crate::config::ValidatorConfig;

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn part(body: &str) -> String {
        format!("<w:document {W}><w:body>{body}</w:body></w:document>")
    }

    fn original() -> String {
        part("<w:p><w:r><w:t>Hello world.</w:t></w:r></w:p>")
    }

    fn context(edited: String) -> CheckContext {
        CheckContext::new(PartSource::Inline(edited), ValidatorConfig::for_author("Claude"))
            .with_original(PartSource::Inline(original()))
    }

    #[test]
    fn default_pipeline_order() {
        let validator = Validator::with_default_checks();
        assert_eq!(validator.check_count(), 4);
        let report = validator.run(&context(original()));
        let names: Vec<&str> = report.results.iter().map(|r| r.check_name.as_str()).collect();
        assert_eq!(names, vec!["well-formedness", "whitespace", "deletions", "revision"]);
    }

    #[test]
    fn states_move_from_pending_through_running_to_completed() {
        let edited = part("<w:p><w:r><w:t>Hello there.</w:t></w:r></w:p>");
        let mut seen = Vec::new();
        let report = Validator::with_default_checks()
            .run_observed(&context(edited), |name, state| seen.push((name.to_string(), state)));

        assert_eq!(seen.len(), 4 * 3);
        assert!(seen[..4].iter().all(|(_, s)| *s == CheckState::Pending));
        let revision: Vec<CheckState> = seen
            .iter()
            .filter(|(name, _)| name == "revision")
            .map(|(_, s)| *s)
            .collect();
        assert_eq!(
            revision,
            vec![
                CheckState::Pending,
                CheckState::Running,
                CheckState::Completed { passed: false },
            ]
        );
        assert_eq!(
            report.result("revision").unwrap().state,
            CheckState::Completed { passed: false }
        );
    }

    #[test]
    fn tracked_edit_passes() {
        let edited = part(
            r#"<w:p><w:r><w:t xml:space="preserve">Hello </w:t></w:r><w:ins w:author="Claude"><w:r><w:t>there,</w:t></w:r></w:ins><w:del w:author="Claude"><w:r><w:delText>world.</w:delText></w:r></w:del></w:p>"#,
        );
        let report = Validator::with_default_checks().run(&context(edited));
        assert!(report.passed, "{report:?}");
        assert_eq!(report.failures().count(), 0);
        assert!(report.results.iter().all(|r| matches!(r.state, CheckState::Completed { passed: true })));
        assert_eq!(
            report.paragraphs,
            Some(ParagraphDelta { original: 1, edited: 1 })
        );
    }

    #[test]
    fn untracked_edit_fails_with_diff() {
        let edited = part("<w:p><w:r><w:t>Hello there.</w:t></w:r></w:p>");
        let report = Validator::with_default_checks().run(&context(edited));
        assert!(!report.passed);
        let revision = report.result("revision").unwrap();
        assert!(!revision.passed);
        assert!(revision.diff.as_deref().unwrap().contains("+Hello there."));
        assert!(report.result("deletions").unwrap().passed);
        assert!(report.result("whitespace").unwrap().passed);
    }

    #[test]
    fn every_check_reports_even_after_a_failure() {
        let edited = part(
            r#"<w:p><w:r><w:t> lead</w:t></w:r><w:del w:author="Claude"><w:r><w:t>live</w:t></w:r></w:del></w:p>"#,
        );
        let report = Validator::with_default_checks().run(&context(edited));
        assert!(!report.passed);
        assert_eq!(report.results.len(), 4);
        assert!(!report.result("whitespace").unwrap().passed);
        assert!(!report.result("deletions").unwrap().passed);
        assert!(!report.result("revision").unwrap().passed);
    }

    #[test]
    fn parse_failure_aborts_only_dependent_checks() {
        let report = Validator::with_default_checks().run(&context("<w:document".into()));
        assert!(!report.passed);
        assert!(report.result("well-formedness").unwrap().passed);
        for name in ["whitespace", "deletions", "revision"] {
            let result = report.result(name).unwrap();
            assert!(!result.passed);
            assert_eq!(result.violations.len(), 1);
            assert_eq!(result.violations[0].kind, ViolationKind::ParseError);
        }
        assert!(report.paragraphs.is_none());
    }

    #[test]
    fn missing_original_fails_revision_only() {
        let ctx = CheckContext::new(PartSource::Inline(original()), ValidatorConfig::default());
        let report = Validator::with_default_checks().run(&ctx);
        assert!(!report.passed);
        let revision = report.result("revision").unwrap();
        assert_eq!(revision.violations[0].kind, ViolationKind::MissingPart);
        assert_eq!(report.failures().count(), 1);
    }

    struct Reject;

    impl SchemaValidator for Reject {
        fn validate(&self, _doc: &Document) -> SchemaVerdict {
            SchemaVerdict::fail(vec!["element not allowed".into()])
        }
    }

    #[test]
    fn schema_check_runs_second() {
        let validator = Validator::with_schema(Box::new(Reject));
        assert_eq!(validator.check_count(), 5);
        let report = validator.run(&context(original()));
        assert_eq!(report.results[1].check_name, "schema");
        assert!(!report.passed);
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn paragraph_delta_display() {
        let delta = ParagraphDelta { original: 3, edited: 5 };
        assert_eq!(delta.to_string(), "Paragraphs: 3 \u{2192} 5 (+2)");
        let shrink = ParagraphDelta { original: 4, edited: 2 };
        assert_eq!(shrink.to_string(), "Paragraphs: 4 \u{2192} 2 (-2)");
    }

    #[test]
    fn report_serializes_to_json() {
        let report = Validator::with_default_checks().run(&context(original()));
        let json = report.to_json().unwrap();
        assert!(json.contains("\"passed\": true"));
        assert!(json.contains("\"check_name\": \"revision\""));
    }
}
