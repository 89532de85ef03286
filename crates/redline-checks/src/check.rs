use std::fmt;
use std::time::Duration;

use redline_package::PartSource;
use redline_tree::Document;
use serde::{Deserialize, Serialize};

use crate::config::ValidatorConfig;
use crate::error::CheckError;

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// Category of a reported problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Illegal structure in a parsed tree (e.g. live text under a deletion).
    StructuralViolation,
    /// A part is not well-formed XML.
    ParseError,
    /// An expected part or document is absent.
    MissingPart,
    /// Projections differ after reverting the author's changes.
    ComparisonMismatch,
    /// Reported by an external schema validator.
    SchemaViolation,
    /// The container could not be read.
    PackageViolation,
    Configuration,
}

/// Where a violation was found.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Part path inside the container, e.g. `word/document.xml`.
    pub part: String,
    /// 1-based source line, when known.
    pub line: Option<usize>,
    /// Element path, e.g. `/w:document/w:body/w:p[2]/w:del[1]/w:r[1]/w:t[1]`.
    pub path: Option<String>,
}

impl Location {
    pub fn part(part: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            line: None,
            path: None,
        }
    }

    pub fn at(part: impl Into<String>, line: usize, path: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            line: (line > 0).then_some(line),
            path: Some(path.into()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.part)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " {path}")?;
        }
        Ok(())
    }
}

/// One reported problem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub location: Location,
    pub message: String,
}

impl Violation {
    pub fn structural(location: Location, message: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::StructuralViolation,
            location,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Quote `text` and cut the quoted form to `max_len` characters, marking
/// truncation with `...`.
pub fn text_preview(text: &str, max_len: usize) -> String {
    let quoted = format!("{text:?}");
    if quoted.chars().count() > max_len {
        let cut: String = quoted.chars().take(max_len).collect();
        format!("{cut}...")
    } else {
        quoted
    }
}

// ---------------------------------------------------------------------------
// CheckContext
// ---------------------------------------------------------------------------

/// Inputs shared by every check in a run.
///
/// Checks load and parse their own trees from these sources, so a part that
/// fails to parse only fails the checks that read it.
#[derive(Clone, Debug)]
pub struct CheckContext {
    pub edited: PartSource,
    pub original: Option<PartSource>,
    pub config: ValidatorConfig,
}

impl CheckContext {
    pub fn new(edited: PartSource, config: ValidatorConfig) -> Self {
        Self {
            edited,
            original: None,
            config,
        }
    }

    /// Attach the original packaged document to compare against.
    pub fn with_original(mut self, original: PartSource) -> Self {
        self.original = Some(original);
        self
    }

    pub fn author(&self) -> &str {
        &self.config.author
    }

    /// Part label used in violation locations.
    pub fn part(&self) -> &str {
        &self.config.main_part
    }

    /// Load and parse the edited main part.
    pub fn load_edited(&self) -> Result<Document, CheckError> {
        load(&self.edited, &self.config.main_part)
    }

    /// Load and parse the original main part.
    pub fn load_original(&self) -> Result<Document, CheckError> {
        let source = self.original.as_ref().ok_or(CheckError::MissingOriginal)?;
        load(source, &self.config.main_part)
    }
}

fn load(source: &PartSource, main_part: &str) -> Result<Document, CheckError> {
    let xml = source.load(main_part)?;
    Document::parse(&xml).map_err(|e| CheckError::parse(main_part, e))
}

// ---------------------------------------------------------------------------
// Check outcome and result
// ---------------------------------------------------------------------------

/// What a check found. It passed iff there are no violations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub violations: Vec<Violation>,
    /// Unified diff accompanying a comparison mismatch.
    pub diff: Option<String>,
    /// Informational lines that never affect pass/fail.
    pub notes: Vec<String>,
}

impl CheckOutcome {
    pub fn pass() -> Self {
        Self::default()
    }

    pub fn with_violations(violations: Vec<Violation>) -> Self {
        Self {
            violations,
            ..Default::default()
        }
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_pass(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Lifecycle of one check within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Pending,
    Running,
    Completed { passed: bool },
}

/// Recorded result of one check.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub check_name: String,
    pub state: CheckState,
    pub passed: bool,
    pub violations: Vec<Violation>,
    pub diff: Option<String>,
    pub notes: Vec<String>,
    pub elapsed: Duration,
}

impl CheckResult {
    pub(crate) fn completed(name: &str, outcome: CheckOutcome, elapsed: Duration) -> Self {
        let passed = outcome.is_pass();
        Self {
            check_name: name.to_string(),
            state: CheckState::Completed { passed },
            passed,
            violations: outcome.violations,
            diff: outcome.diff,
            notes: outcome.notes,
            elapsed,
        }
    }
}

// ---------------------------------------------------------------------------
// Check trait
// ---------------------------------------------------------------------------

/// A single, stateless check in the validation pipeline.
///
/// The trait is object-safe and `Send + Sync` so checks can be stored in a
/// `Vec<Box<dyn Check>>` and, since they only read their inputs, run in any
/// order.
pub trait Check: Send + Sync {
    /// Short name of the check (e.g., "deletions", "revision").
    fn name(&self) -> &str;

    /// Run the check. An `Err` aborts only this check.
    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError>;
}
