//! Diff reporting for redline.
//!
//! When two text projections disagree, [`DiffReporter`] renders the
//! discrepancy as a unified line diff labeled with both origins.
//!
//! # Key Types
//!
//! - [`DiffReporter`] -- Compares two paragraph sequences
//! - [`ProjectionDiff`] / [`DiffHunk`] / [`DiffLine`] -- Structured and rendered diff

pub mod reporter;

pub use reporter::{DiffHunk, DiffLine, DiffReporter, ProjectionDiff};
