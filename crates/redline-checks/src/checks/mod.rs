//! Built-in checks.

pub mod deletion;
pub mod revision;
pub mod schema;
pub mod wellformed;
pub mod whitespace;

pub use deletion::DeletionIntegrityCheck;
pub use revision::RevisionCheck;
pub use schema::{SchemaCheck, SchemaValidator, SchemaVerdict};
pub use wellformed::WellFormednessCheck;
pub use whitespace::WhitespaceIntegrityCheck;
