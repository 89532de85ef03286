//! Error types for the tree crate.

/// Errors that can occur while reading or writing a document tree.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// The input is not well-formed XML.
    #[error("XML parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An element or attribute uses a prefix with no namespace declaration in scope.
    #[error("unbound namespace prefix '{prefix}' at line {line}")]
    UnboundPrefix { prefix: String, line: usize },

    /// The input ended while an element was still open.
    #[error("element <{name}> opened at line {line} is never closed")]
    Unclosed { name: String, line: usize },

    /// The input contains no root element.
    #[error("document has no root element")]
    NoRoot,

    /// Serializing the tree back to XML failed.
    #[error("write error: {0}")]
    Write(String),
}

impl TreeError {
    /// Source line the error refers to, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. }
            | Self::UnboundPrefix { line, .. }
            | Self::Unclosed { line, .. } => Some(*line),
            Self::NoRoot | Self::Write(_) => None,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
