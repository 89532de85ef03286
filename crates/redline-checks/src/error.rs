use redline_package::PackageError;
use redline_tree::TreeError;

use crate::check::{Location, Violation, ViolationKind};

/// Errors that abort a single check.
///
/// The validator never propagates these: each one becomes the failing
/// check's only violation, and the remaining checks still run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A part could not be parsed as XML.
    #[error("cannot parse {part}: {source}")]
    Parse {
        part: String,
        #[source]
        source: TreeError,
    },

    /// A part could not be located or read.
    #[error(transparent)]
    Package(#[from] PackageError),

    /// The comparison needs an original document but none was given.
    #[error("no original document was provided for comparison")]
    MissingOriginal,

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CheckError {
    pub fn parse(part: impl Into<String>, source: TreeError) -> Self {
        Self::Parse {
            part: part.into(),
            source,
        }
    }

    /// Violation category this error is reported under.
    pub fn kind(&self) -> ViolationKind {
        match self {
            Self::Parse { .. } => ViolationKind::ParseError,
            Self::Package(PackageError::MissingPart { .. }) | Self::MissingOriginal => {
                ViolationKind::MissingPart
            }
            Self::Package(_) => ViolationKind::PackageViolation,
            Self::Config(_) => ViolationKind::Configuration,
        }
    }

    /// The single violation reported in place of the check's findings.
    pub fn to_violation(&self, part: &str) -> Violation {
        let line = match self {
            Self::Parse { source, .. } => source.line(),
            _ => None,
        };
        let part = match self {
            Self::Parse { part, .. } => part.as_str(),
            _ => part,
        };
        Violation {
            kind: self.kind(),
            location: Location {
                part: part.to_string(),
                line,
                path: None,
            },
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_line() {
        let err = CheckError::parse(
            "word/document.xml",
            TreeError::Parse {
                line: 7,
                message: "bad".into(),
            },
        );
        let v = err.to_violation("ignored");
        assert_eq!(v.kind, ViolationKind::ParseError);
        assert_eq!(v.location.part, "word/document.xml");
        assert_eq!(v.location.line, Some(7));
    }

    #[test]
    fn missing_part_kind() {
        let err = CheckError::from(PackageError::MissingPart {
            part: "word/document.xml".into(),
            container: "x.docx".into(),
        });
        assert_eq!(err.kind(), ViolationKind::MissingPart);
        assert_eq!(CheckError::MissingOriginal.kind(), ViolationKind::MissingPart);
    }

    #[test]
    fn archive_failure_is_package_violation() {
        let err = CheckError::from(PackageError::Archive {
            path: "x.docx".into(),
            message: "invalid zip".into(),
        });
        assert_eq!(err.kind(), ViolationKind::PackageViolation);
        assert!(err.to_violation("word/document.xml").message.contains("invalid zip"));
    }
}
