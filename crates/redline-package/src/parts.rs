//! Container extraction and part enumeration.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{PackageError, PackageResult};

/// Location of the main document part inside a WordprocessingML container.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// A container unpacked into a temporary directory.
///
/// The directory and everything in it is removed when this value is dropped,
/// whether the caller finished normally or bailed out with an error.
#[derive(Debug)]
pub struct UnpackedPackage {
    source: PathBuf,
    dir: TempDir,
}

impl UnpackedPackage {
    /// Extract every entry of the zip container at `path`.
    pub fn extract(path: &Path) -> PackageResult<Self> {
        let archive_err = |message: String| PackageError::Archive {
            path: path.to_path_buf(),
            message,
        };
        let dir = tempfile::tempdir()?;
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| archive_err(e.to_string()))?;
        archive
            .extract(dir.path())
            .map_err(|e| archive_err(e.to_string()))?;
        debug!(package = %path.display(), entries = archive.len(), "package extracted");
        Ok(Self {
            source: path.to_path_buf(),
            dir,
        })
    }

    /// Root of the extracted tree.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Read one part as UTF-8 text.
    pub fn read_part(&self, part: &str) -> PackageResult<String> {
        read_part_from(self.root(), part, &self.source)
    }
}

/// Read `part` (a `/`-separated path) below `root`. `container` names the
/// package in the error when the part is absent.
pub(crate) fn read_part_from(root: &Path, part: &str, container: &Path) -> PackageResult<String> {
    let path = part.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg));
    if !path.is_file() {
        return Err(PackageError::MissingPart {
            part: part.to_string(),
            container: container.to_path_buf(),
        });
    }
    let bytes = std::fs::read(&path)?;
    String::from_utf8(bytes).map_err(|_| PackageError::Encoding { part: path })
}

/// All XML parts (`.xml` and `.rels`) below `dir`, relative to it, sorted.
pub fn list_xml_parts(dir: &Path) -> PackageResult<Vec<PathBuf>> {
    let mut parts = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| PackageError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_xml = matches!(
            entry.path().extension().and_then(|e| e.to_str()),
            Some("xml") | Some("rels")
        );
        if is_xml {
            if let Ok(relative) = entry.path().strip_prefix(dir) {
                parts.push(relative.to_path_buf());
            }
        }
    }
    parts.sort();
    Ok(parts)
}

/// Write `(name, content)` parts into a new zip container at `path`.
pub fn write_package(path: &Path, parts: &[(&str, &str)]) -> PackageResult<()> {
    let file = File::create(path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in parts {
        writer
            .start_file(*name, options)
            .map_err(|e| PackageError::Archive {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        writer.write_all(content.as_bytes())?;
    }
    writer.finish().map_err(|e| PackageError::Archive {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}
