use redline_package::list_xml_parts;
use redline_tree::Document;
use tracing::debug;

use crate::check::{Check, CheckContext, CheckOutcome, Location, Violation, ViolationKind};
use crate::error::CheckError;

/// Every XML part of an unpacked container must parse. Only applies when
/// the edited document is given as an unpacked directory.
pub struct WellFormednessCheck;

impl Check for WellFormednessCheck {
    fn name(&self) -> &str {
        "well-formedness"
    }

    fn run(&self, context: &CheckContext) -> Result<CheckOutcome, CheckError> {
        let Some(dir) = context.edited.unpacked_dir() else {
            return Ok(CheckOutcome::pass().note("no unpacked container; skipped"));
        };

        let parts = list_xml_parts(dir)?;
        let mut violations = Vec::new();
        for part in &parts {
            let label = part.to_string_lossy().replace('\\', "/");
            let bytes = std::fs::read(dir.join(part)).map_err(redline_package::PackageError::from)?;
            let Ok(xml) = String::from_utf8(bytes) else {
                violations.push(Violation {
                    kind: ViolationKind::ParseError,
                    location: Location::part(&label),
                    message: "part is not valid UTF-8".into(),
                });
                continue;
            };
            if let Err(e) = Document::parse(&xml) {
                violations.push(Violation {
                    kind: ViolationKind::ParseError,
                    location: Location {
                        part: label,
                        line: e.line(),
                        path: None,
                    },
                    message: e.to_string(),
                });
            }
        }
        debug!(parts = parts.len(), broken = violations.len(), "checked part well-formedness");
        Ok(CheckOutcome::with_violations(violations).note(format!("{} XML part(s) checked", parts.len())))
    }
}
