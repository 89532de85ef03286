use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("{part} not found in {container}")]
    MissingPart { part: String, container: PathBuf },

    #[error("cannot read package {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("part {part} is not valid UTF-8")]
    Encoding { part: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PackageResult<T> = Result<T, PackageError>;
