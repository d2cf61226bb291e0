pub mod basics;
pub mod conversion;
pub mod editor;
pub mod link;
pub mod model;
pub mod typing;
pub mod view;

// Re-export key types for easier usage
pub use conversion::DataError;
pub use editor::{Editor, EditorConfig};
pub use link::{
    CLASS_HIGHLIGHT, InternalLinkEditing, LinkCommand, LinkHighlighter,
    MODEL_INTERNAL_LINK_ID_ATTRIBUTE, UnlinkCommand, VIEW_INTERNAL_LINK_ID_ATTRIBUTE,
    VIEW_INTERNAL_LINK_TAG, find_link_range,
};
pub use model::{ModelDocument, ModelError, ModelRange, ModelSelection, Position};
pub use typing::{CaretDirection, CaretMove, CaretState};
