//! Document tree model for redline.
//!
//! A parsed document part is an ordered, namespaced element tree. Trees are
//! read-only once parsed: every transformation in the other redline crates
//! builds a derived copy instead of mutating a shared tree.
//!
//! # Key Types
//!
//! - [`Document`] / [`Node`] -- Parsed part and its element nodes
//! - [`QName`] / [`Attribute`] -- Namespace-resolved names
//! - [`Vocabulary`] / [`NodeKind`] -- Which tags mean paragraph, text, insertion, deletion
//! - [`TreeError`] -- Parse and write failures

pub mod error;
pub mod name;
pub mod node;
pub mod reader;
pub mod vocabulary;
pub mod writer;

pub use error::{TreeError, TreeResult};
pub use name::{Attribute, QName, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use node::{Document, Node};
pub use vocabulary::{NodeKind, Vocabulary, WORDPROCESSING_NAMESPACE};
