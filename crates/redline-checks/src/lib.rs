//! Tracked-change integrity checks for redline.
//!
//! An edited document part is run through a pipeline of independent checks
//! (well-formedness, optional schema validation, whitespace preservation,
//! deletion integrity, and reversion comparison). Unlike a fail-fast gate,
//! every check always runs and reports its own findings; the aggregate
//! verdict is the logical AND of all of them.
//!
//! # Quick Start
//!
//! ```rust
//! use redline_checks::{CheckContext, Validator, ValidatorConfig};
//! use redline_package::PartSource;
//!
//! let original = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Hello world.</w:t></w:r></w:p></w:body></w:document>"#;
//! let ctx = CheckContext::new(PartSource::Inline(original.into()), ValidatorConfig::default())
//!     .with_original(PartSource::Inline(original.into()));
//! let report = Validator::with_default_checks().run(&ctx);
//! assert!(report.passed);
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod error;
pub mod validator;

// Re-exports for convenience.
pub use check::{
    text_preview, Check, CheckContext, CheckOutcome, CheckResult, CheckState, Location, Violation,
    ViolationKind,
};
pub use checks::deletion::DeletionIntegrityCheck;
pub use checks::revision::RevisionCheck;
pub use checks::schema::{SchemaCheck, SchemaValidator, SchemaVerdict};
pub use checks::wellformed::WellFormednessCheck;
pub use checks::whitespace::{has_boundary_whitespace, WhitespaceIntegrityCheck};
pub use config::ValidatorConfig;
pub use error::CheckError;
pub use validator::{ParagraphDelta, ValidationReport, Validator};
