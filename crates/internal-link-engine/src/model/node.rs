use std::collections::BTreeMap;

/// Attribute map of a model node. Ordered so conversion output is deterministic.
pub type Attributes = BTreeMap<String, String>;

/// A run of characters sharing one attribute map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelText {
    pub data: String,
    pub attributes: Attributes,
}

impl ModelText {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Length in offset units (characters, not bytes)
    pub fn len(&self) -> usize {
        self.data.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Split the text at a character offset, keeping the head in `self`.
    pub(crate) fn split_off(&mut self, at: usize) -> ModelText {
        let byte_index = self
            .data
            .char_indices()
            .nth(at)
            .map_or(self.data.len(), |(index, _)| index);
        ModelText {
            data: self.data.split_off(byte_index),
            attributes: self.attributes.clone(),
        }
    }
}

/// A block (`paragraph`) or inline (`softBreak`) element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<ModelNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelNode {
    Element(ModelElement),
    Text(ModelText),
}

impl ModelNode {
    /// Number of offsets the node occupies in its parent: one per character
    /// for text, one for an element.
    pub fn offset_size(&self) -> usize {
        match self {
            ModelNode::Text(text) => text.len(),
            ModelNode::Element(_) => 1,
        }
    }

    pub fn as_text(&self) -> Option<&ModelText> {
        match self {
            ModelNode::Text(text) => Some(text),
            ModelNode::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&ModelElement> {
        match self {
            ModelNode::Element(element) => Some(element),
            ModelNode::Text(_) => None,
        }
    }

    /// Attribute value of a text node. Elements never carry text attributes.
    pub fn text_attribute(&self, key: &str) -> Option<&str> {
        self.as_text().and_then(|text| text.attribute(key))
    }
}

impl From<ModelText> for ModelNode {
    fn from(text: ModelText) -> Self {
        ModelNode::Text(text)
    }
}

impl From<ModelElement> for ModelNode {
    fn from(element: ModelElement) -> Self {
        ModelNode::Element(element)
    }
}

/// Where an offset falls relative to the children of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ChildSpan {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl ModelElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ModelNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Offset just after the last child.
    pub fn max_offset(&self) -> usize {
        self.children.iter().map(ModelNode::offset_size).sum()
    }

    /// Concatenated text of the inline children; elements contribute nothing.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(ModelNode::as_text)
            .map(|text| text.data.as_str())
            .collect()
    }

    pub(crate) fn child_spans(&self) -> impl Iterator<Item = ChildSpan> + '_ {
        self.children
            .iter()
            .enumerate()
            .scan(0, |offset, (index, child)| {
                let start = *offset;
                *offset += child.offset_size();
                Some(ChildSpan {
                    index,
                    start,
                    end: *offset,
                })
            })
    }

    /// Text node strictly containing `offset` (not at one of its edges).
    pub(crate) fn text_span_containing(&self, offset: usize) -> Option<ChildSpan> {
        self.child_spans().find(|span| {
            span.start < offset
                && offset < span.end
                && matches!(self.children[span.index], ModelNode::Text(_))
        })
    }

    /// Child ending exactly at `offset`.
    pub(crate) fn span_before(&self, offset: usize) -> Option<ChildSpan> {
        self.child_spans()
            .find(|span| span.end == offset && span.end > span.start)
    }

    /// Child starting exactly at `offset`.
    pub(crate) fn span_after(&self, offset: usize) -> Option<ChildSpan> {
        self.child_spans()
            .find(|span| span.start == offset && span.end > span.start)
    }

    /// Make `offset` fall on a child boundary, splitting a text node if
    /// needed. Returns the index of the first child at or after `offset`.
    pub(crate) fn split_at(&mut self, offset: usize) -> usize {
        if let Some(span) = self.text_span_containing(offset) {
            if let ModelNode::Text(text) = &mut self.children[span.index] {
                let tail = text.split_off(offset - span.start);
                self.children.insert(span.index + 1, ModelNode::Text(tail));
            }
            return span.index + 1;
        }
        self.child_spans()
            .find(|span| span.start >= offset)
            .map_or(self.children.len(), |span| span.index)
    }

    /// Merge adjacent text nodes with equal attributes and drop empty ones.
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<ModelNode> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            match child {
                ModelNode::Text(text) if text.is_empty() => {}
                ModelNode::Text(text) => match merged.last_mut() {
                    Some(ModelNode::Text(previous)) if previous.attributes == text.attributes => {
                        previous.data.push_str(&text.data);
                    }
                    _ => merged.push(ModelNode::Text(text)),
                },
                element => merged.push(element),
            }
        }
        self.children = merged;
    }
}
