//! Package access for redline.
//!
//! Office documents are zip containers of XML parts. This crate finds the
//! main document part whether it comes inline, as a loose file, from an
//! unpacked directory, or from a packaged container extracted into a
//! temporary directory for the duration of a single load.

pub mod error;
pub mod parts;
pub mod source;

pub use error::{PackageError, PackageResult};
pub use parts::{list_xml_parts, write_package, UnpackedPackage, DEFAULT_MAIN_PART};
pub use source::PartSource;
