use std::collections::BTreeSet;

use crate::model::Attributes;

/// Priority of formatting wrappers such as `<strong>`. Wrappers with a lower
/// priority are rendered outside wrappers with a higher one.
pub const DEFAULT_PRIORITY: u8 = 10;

/// Arena index of a view node. Ids are never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewNodeId(pub(crate) usize);

/// What an attribute element represents, fixed when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapperKind {
    /// Plain inline formatting (bold, italic)
    Formatting,
    /// An internal link wrapper
    InternalLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Block-level element holding inline content
    Container,
    /// Inline wrapper created from a text attribute
    Attribute(WrapperKind),
    /// Element without children (`<br/>`)
    Empty,
    /// Editing-only element with no model counterpart
    Ui,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewElement {
    pub name: String,
    pub attributes: Attributes,
    pub classes: BTreeSet<String>,
    pub kind: ElementKind,
    pub priority: u8,
}

impl ViewElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            classes: BTreeSet::new(),
            kind,
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Container)
    }

    pub fn attribute(name: impl Into<String>, wrapper: WrapperKind, priority: u8) -> Self {
        Self {
            priority,
            ..Self::new(name, ElementKind::Attribute(wrapper))
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Empty)
    }

    pub fn ui(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Ui)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute_value(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn wrapper_kind(&self) -> Option<WrapperKind> {
        match self.kind {
            ElementKind::Attribute(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    /// Two wrappers render as one element when everything but classes matches.
    pub fn is_similar(&self, other: &ViewElement) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.priority == other.priority
            && self.attributes == other.attributes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNodeData {
    Root,
    Element(ViewElement),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ViewNode {
    pub data: ViewNodeData,
    pub(crate) parent: Option<ViewNodeId>,
    pub(crate) children: Vec<ViewNodeId>,
}

impl ViewNode {
    pub fn as_element(&self) -> Option<&ViewElement> {
        match &self.data {
            ViewNodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            ViewNodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<ViewNodeId> {
        self.parent
    }

    pub fn children(&self) -> &[ViewNodeId] {
        &self.children
    }
}
