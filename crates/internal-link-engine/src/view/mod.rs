//! # View Tree
//!
//! The renderable side of the editor. Two trees are built from one model:
//! the data view (persisted form) produced on demand by
//! [`crate::conversion::data`], and the long-lived editing view kept in sync
//! by [`crate::conversion::editing`].
//!
//! Inline wrappers are *attribute elements*. Each carries an
//! [`ElementKind`] fixed at construction, so "is this a link wrapper" is an
//! equality check rather than a tag-name comparison.

pub mod markup;
pub mod node;
pub mod tree;
pub mod writer;

pub use node::{
    DEFAULT_PRIORITY, ElementKind, ViewElement, ViewNode, ViewNodeData, ViewNodeId, WrapperKind,
};
pub use tree::{ViewRange, ViewTree};
pub use writer::ViewWriter;
