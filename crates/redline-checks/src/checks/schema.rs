use redline_tree::Document;
use serde::{Deserialize, Serialize};

use crate::check::{Check, CheckContext, CheckOutcome, Location, Violation, ViolationKind};
use crate::error::CheckError;

/// Verdict of an external schema validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaVerdict {
    pub passed: bool,
    pub messages: Vec<String>,
}

impl SchemaVerdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            messages: Vec::new(),
        }
    }

    pub fn fail(messages: Vec<String>) -> Self {
        Self {
            passed: false,
            messages,
        }
    }
}

/// Boundary to a schema validator. Schema rules live entirely on the
/// other side: redline hands over a parsed tree and records the verdict.
pub trait SchemaValidator: Send + Sync {
    fn validate(&self, doc: &Document) -> SchemaVerdict;
}

/// Runs a [`SchemaValidator`] on the edited main part.
pub struct SchemaCheck {
    validator: Box<dyn SchemaValidator>,
}

impl SchemaCheck {
    pub fn new(validator: Box<dyn SchemaValidator>) -> Self {
        Self { validator }
    }
}

impl Check for SchemaCheck {
    fn name(&self) -> &str {
        "schema"
    }

    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError> {
        let doc = context.load_edited()?;
        let verdict = self.validator.validate(&doc);
        if verdict.passed {
            return Ok(CheckOutcome::pass());
        }

        let mut messages = verdict.messages;
        if messages.is_empty() {
            messages.push("schema validation failed".into());
        }
        let violations = messages
            .into_iter()
            .map(|message| Violation {
                kind: ViolationKind::SchemaViolation,
                location: Location::part(context.part()),
                message,
            })
            .collect();
        Ok(CheckOutcome::with_violations(violations))
    }
}
