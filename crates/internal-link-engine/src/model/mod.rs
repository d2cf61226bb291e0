//! # Document Model
//!
//! The abstract side of the editor: a root holding blocks, blocks holding
//! text runs and inline elements. Text runs carry an attribute map, which is
//! where the `internalLinkId` annotation lives.
//!
//! Every mutation goes through [`ModelDocument`], which records which blocks
//! changed so the editing view can re-render only those.

pub mod document;
pub mod node;
pub mod position;
pub mod schema;
pub mod selection;

pub use document::{Changes, ModelDocument};
pub use node::{Attributes, ModelElement, ModelNode, ModelText};
pub use position::{ModelRange, Position};
pub use schema::Schema;
pub use selection::ModelSelection;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("No element at path {0:?}")]
    InvalidPath(Vec<usize>),
    #[error("Offset {offset} is outside of element at {path:?} (max {max})")]
    OffsetOutOfBounds {
        path: Vec<usize>,
        offset: usize,
        max: usize,
    },
    #[error("Range {0} spans more than one parent")]
    RangeSpansParents(ModelRange),
    #[error("Attribute `{0}` is not allowed on text")]
    AttributeNotAllowed(String),
    #[error("Element `{0}` is not allowed here")]
    ElementNotAllowed(String),
}
