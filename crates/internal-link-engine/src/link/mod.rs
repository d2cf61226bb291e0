//! # Internal Links
//!
//! An internal link is a text attribute, [`MODEL_INTERNAL_LINK_ID_ATTRIBUTE`],
//! whose value is the id of the link target. In views it becomes an
//! `<internallink internallinkid="…">` wrapper with a lower priority than
//! formatting, so it always renders outermost.
//!
//! - [`find_link_range`] locates the run of text carrying one link id
//! - [`utils`] builds and recognises link wrappers and resolves link URLs
//! - [`editing::InternalLinkEditing`] registers schema, conversion and caret rules
//! - [`highlight::LinkHighlighter`] marks the link under the selection in the
//!   editing view
//! - [`commands`] link and unlink the selection

pub mod commands;
pub mod editing;
pub mod find_link_range;
pub mod highlight;
pub mod utils;

pub use commands::{LinkCommand, UnlinkCommand};
pub use editing::InternalLinkEditing;
pub use find_link_range::find_link_range;
pub use highlight::{HighlightPhase, LinkHighlighter};
pub use utils::{create_link_element, is_link_element, new_link_id, replace_placeholder_in_url};

pub const MODEL_INTERNAL_LINK_ID_ATTRIBUTE: &str = "internalLinkId";
pub const VIEW_INTERNAL_LINK_TAG: &str = "internallink";
pub const VIEW_INTERNAL_LINK_ID_ATTRIBUTE: &str = "internallinkid";

/// Class added to link wrappers while the selection is inside them.
pub const CLASS_HIGHLIGHT: &str = "ck-link_selected";

/// Priority of link wrappers; below [`crate::view::DEFAULT_PRIORITY`].
pub const LINK_PRIORITY: u8 = 5;
