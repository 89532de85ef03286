use std::path::Path;

use redline_package::DEFAULT_MAIN_PART;
use redline_tree::Vocabulary;
use serde::{Deserialize, Serialize};

use crate::error::CheckError;

/// Configuration for a validation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Author whose tracked changes are reverted for comparison. Matched
    /// exactly, case-sensitively.
    pub author: String,
    /// Path of the main document part inside a container.
    pub main_part: String,
    /// Maximum length of quoted text previews in violation messages.
    pub preview_len: usize,
    /// Context lines shown around each hunk of a comparison diff.
    pub diff_context: usize,
    /// Tag names for paragraphs, text, and tracked-change markers.
    pub vocabulary: Vocabulary,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            author: "Claude".into(),
            main_part: DEFAULT_MAIN_PART.into(),
            preview_len: 50,
            diff_context: 3,
            vocabulary: Vocabulary::default(),
        }
    }
}

impl ValidatorConfig {
    /// Default configuration for a different author.
    pub fn for_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Default::default()
        }
    }

    /// Parse a TOML configuration. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, CheckError> {
        let config: Self = toml::from_str(source).map_err(|e| CheckError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CheckError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<(), CheckError> {
        if self.author.is_empty() {
            return Err(CheckError::Config("author must not be empty".into()));
        }
        if self.main_part.trim_matches('/').is_empty() {
            return Err(CheckError::Config("main_part must name a part".into()));
        }
        Ok(())
    }

    /// File name of the main part (`document.xml`), used in diff labels.
    pub fn main_part_name(&self) -> &str {
        self.main_part.rsplit('/').next().unwrap_or(&self.main_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ValidatorConfig::default();
        assert_eq!(c.author, "Claude");
        assert_eq!(c.main_part, "word/document.xml");
        assert_eq!(c.preview_len, 50);
        assert_eq!(c.diff_context, 3);
        assert_eq!(c.main_part_name(), "document.xml");
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let c = ValidatorConfig::from_toml_str(
            r#"
            author = "Reviewer"
            diff_context = 1

            [vocabulary]
            author = "creator"
            "#,
        )
        .unwrap();
        assert_eq!(c.author, "Reviewer");
        assert_eq!(c.diff_context, 1);
        assert_eq!(c.preview_len, 50);
        assert_eq!(c.vocabulary.author, "creator");
        assert_eq!(c.vocabulary.deletion, "del");
    }

    #[test]
    fn empty_author_rejected() {
        let err = ValidatorConfig::from_toml_str(r#"author = """#).unwrap_err();
        assert!(matches!(err, CheckError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(ValidatorConfig::from_toml_str("author = ").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redline.toml");
        std::fs::write(&path, "author = \"Editor\"\n").unwrap();
        assert_eq!(ValidatorConfig::load(&path).unwrap().author, "Editor");
    }
}
