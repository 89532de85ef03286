//! Tracked-change reversion and text projection.
//!
//! [`TrackedChangeResolver`] undoes one author's proposed insertions and
//! deletions, producing a derived tree. [`TextProjector`] linearizes a tree
//! into paragraph-ordered plain text so two trees can be compared by content.
//!
//! # Key Types
//!
//! - [`TrackedChangeResolver`] / [`ResolveStats`] / [`MarkerCount`]
//! - [`TextProjector`] / [`Projection`]

pub mod projector;
pub mod resolver;

pub use projector::{Projection, TextProjector, PARAGRAPH_SEPARATOR};
pub use resolver::{MarkerCount, ResolveStats, TrackedChangeResolver};
