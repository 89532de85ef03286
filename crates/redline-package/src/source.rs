//! Where a document part comes from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackageError, PackageResult};
use crate::parts::{read_part_from, UnpackedPackage};

/// The origin of a main document part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartSource {
    /// XML already in memory.
    Inline(String),
    /// A loose XML file.
    File(PathBuf),
    /// An unpacked container directory.
    Unpacked(PathBuf),
    /// A zip container; extracted to a temporary directory per load.
    Packaged(PathBuf),
}

impl PartSource {
    /// Pick a source for a filesystem path: directories are unpacked
    /// containers, `.xml` files are loose parts, anything else is a package.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::Unpacked(path)
        } else if path.extension().and_then(|e| e.to_str()) == Some("xml") {
            Self::File(path)
        } else {
            Self::Packaged(path)
        }
    }

    /// Load the main part's XML text. `main_part` is the `/`-separated path
    /// of the part inside a container; it is ignored for inline and file
    /// sources.
    pub fn load(&self, main_part: &str) -> PackageResult<String> {
        match self {
            Self::Inline(xml) => Ok(xml.clone()),
            Self::File(path) => {
                if !path.is_file() {
                    return Err(PackageError::MissingPart {
                        part: main_part.to_string(),
                        container: path.clone(),
                    });
                }
                let bytes = std::fs::read(path)?;
                String::from_utf8(bytes).map_err(|_| PackageError::Encoding { part: path.clone() })
            }
            Self::Unpacked(dir) => read_part_from(dir, main_part, dir),
            Self::Packaged(path) => UnpackedPackage::extract(path)?.read_part(main_part),
        }
    }

    /// Unpacked container root, if this source has one on disk.
    pub fn unpacked_dir(&self) -> Option<&Path> {
        match self {
            Self::Unpacked(dir) => Some(dir),
            _ => None,
        }
    }

    /// Short label for reports.
    pub fn describe(&self) -> String {
        match self {
            Self::Inline(_) => "<inline>".into(),
            Self::File(path) | Self::Unpacked(path) | Self::Packaged(path) => {
                path.display().to_string()
            }
        }
    }
}
