use std::collections::{BTreeMap, BTreeSet};

use crate::model::{
    Attributes, ModelElement, ModelError, ModelNode, ModelRange, ModelSelection, ModelText,
    Position, Schema,
};

pub const ROOT_NAME: &str = "$root";

/// What changed since the editing view was last rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    /// Top-level blocks whose inline content or markers changed
    pub blocks: BTreeSet<usize>,
    /// The block list itself was replaced
    pub structure: bool,
    /// Selection position or selection attributes changed
    pub selection: bool,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && !self.structure && !self.selection
    }
}

/// The document model: root element, selection and markers.
///
/// All edits are flat: a range never spans two parents. Each edit bumps the
/// version, transforms markers and the selection through the edit, refreshes
/// the selection attributes and records the touched block in [`Changes`].
#[derive(Debug, Clone)]
pub struct ModelDocument {
    root: ModelElement,
    selection: ModelSelection,
    markers: BTreeMap<String, ModelRange>,
    version: u64,
    changes: Changes,
}

impl Default for ModelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDocument {
    pub fn new() -> Self {
        Self {
            root: ModelElement::new(ROOT_NAME),
            selection: ModelSelection::default(),
            markers: BTreeMap::new(),
            version: 0,
            changes: Changes::default(),
        }
    }

    pub fn root(&self) -> &ModelElement {
        &self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }

    pub fn block_count(&self) -> usize {
        self.root.children.len()
    }

    pub fn markers(&self) -> impl Iterator<Item = (&str, &ModelRange)> {
        self.markers
            .iter()
            .map(|(name, range)| (name.as_str(), range))
    }

    pub fn marker(&self, name: &str) -> Option<&ModelRange> {
        self.markers.get(name)
    }

    /// Element addressed by `path`; the empty path is the root.
    pub fn element_at(&self, path: &[usize]) -> Result<&ModelElement, ModelError> {
        let mut element = &self.root;
        for &index in path {
            element = element
                .children
                .get(index)
                .and_then(ModelNode::as_element)
                .ok_or_else(|| ModelError::InvalidPath(path.to_vec()))?;
        }
        Ok(element)
    }

    fn element_at_mut(&mut self, path: &[usize]) -> Result<&mut ModelElement, ModelError> {
        let mut element = &mut self.root;
        for &index in path {
            element = match element.children.get_mut(index) {
                Some(ModelNode::Element(child)) => child,
                _ => return Err(ModelError::InvalidPath(path.to_vec())),
            };
        }
        Ok(element)
    }

    pub fn check_position(&self, position: &Position) -> Result<&ModelElement, ModelError> {
        let element = self.element_at(&position.path)?;
        let max = element.max_offset();
        if position.offset > max {
            return Err(ModelError::OffsetOutOfBounds {
                path: position.path.clone(),
                offset: position.offset,
                max,
            });
        }
        Ok(element)
    }

    pub fn check_range(&self, range: &ModelRange) -> Result<&ModelElement, ModelError> {
        if !range.is_flat() {
            return Err(ModelError::RangeSpansParents(range.clone()));
        }
        self.check_position(&range.start)?;
        self.check_position(&range.end)
    }

    /// Node holding the character (or inline element) just before `position`.
    pub fn node_before(&self, position: &Position) -> Option<&ModelNode> {
        let element = self.element_at(&position.path).ok()?;
        element
            .text_span_containing(position.offset)
            .or_else(|| element.span_before(position.offset))
            .map(|span| &element.children[span.index])
    }

    /// Node holding the character (or inline element) just after `position`.
    pub fn node_after(&self, position: &Position) -> Option<&ModelNode> {
        let element = self.element_at(&position.path).ok()?;
        element
            .text_span_containing(position.offset)
            .or_else(|| element.span_after(position.offset))
            .map(|span| &element.children[span.index])
    }

    pub fn text_attribute_before(&self, position: &Position, key: &str) -> Option<&str> {
        self.node_before(position)
            .and_then(|node| node.text_attribute(key))
    }

    pub fn text_attribute_after(&self, position: &Position, key: &str) -> Option<&str> {
        self.node_after(position)
            .and_then(|node| node.text_attribute(key))
    }

    /// Replace every block. Markers are dropped and the caret goes to the
    /// start of the first block.
    pub fn replace_content(&mut self, blocks: Vec<ModelNode>) {
        self.root.children = blocks;
        self.markers.clear();
        self.selection = ModelSelection::collapsed(Position::in_block(0, 0));
        self.refresh_selection_attributes();
        self.changes.structure = true;
        self.changes.selection = true;
        self.version += 1;
    }

    pub fn insert_text(
        &mut self,
        position: &Position,
        data: &str,
        attributes: Attributes,
        schema: &Schema,
    ) -> Result<ModelRange, ModelError> {
        if let Some(key) = attributes
            .keys()
            .find(|key| !schema.allows_text_attribute(key))
        {
            return Err(ModelError::AttributeNotAllowed(key.clone()));
        }
        self.check_inline_parent(position, "$text")?;
        self.check_position(position)?;

        let text = ModelText {
            data: data.to_string(),
            attributes,
        };
        let len = text.len();
        if len == 0 {
            return Ok(ModelRange::collapsed(position.clone()));
        }

        let element = self.element_at_mut(&position.path)?;
        let index = element.split_at(position.offset);
        element.children.insert(index, ModelNode::Text(text));
        element.normalize();

        self.after_insert(position, len);
        Ok(ModelRange::new(
            position.clone(),
            position.with_offset(position.offset + len),
        ))
    }

    pub fn insert_element(
        &mut self,
        position: &Position,
        inline: ModelElement,
        schema: &Schema,
    ) -> Result<(), ModelError> {
        if !schema.is_inline(&inline.name) {
            return Err(ModelError::ElementNotAllowed(inline.name));
        }
        self.check_inline_parent(position, &inline.name)?;
        self.check_position(position)?;

        let element = self.element_at_mut(&position.path)?;
        let index = element.split_at(position.offset);
        element.children.insert(index, ModelNode::Element(inline));
        element.normalize();

        self.after_insert(position, 1);
        Ok(())
    }

    pub fn remove(&mut self, range: &ModelRange) -> Result<(), ModelError> {
        self.check_range(range)?;
        if range.is_collapsed() {
            return Ok(());
        }

        let element = self.element_at_mut(&range.start.path)?;
        let start = element.split_at(range.start.offset);
        let end = element.split_at(range.end.offset);
        element.children.drain(start..end);
        element.normalize();

        self.after_remove(range);
        Ok(())
    }

    /// Set `key` on every text node in `range`. Inline elements are skipped.
    pub fn set_attribute(
        &mut self,
        range: &ModelRange,
        key: &str,
        value: &str,
        schema: &Schema,
    ) -> Result<(), ModelError> {
        if !schema.allows_text_attribute(key) {
            return Err(ModelError::AttributeNotAllowed(key.to_string()));
        }
        self.update_text_in_range(range, |text| {
            text.attributes.insert(key.to_string(), value.to_string());
        })
    }

    pub fn remove_attribute(&mut self, range: &ModelRange, key: &str) -> Result<(), ModelError> {
        self.update_text_in_range(range, |text| {
            text.attributes.remove(key);
        })
    }

    fn update_text_in_range(
        &mut self,
        range: &ModelRange,
        mut update: impl FnMut(&mut ModelText),
    ) -> Result<(), ModelError> {
        self.check_range(range)?;
        if range.is_collapsed() {
            return Ok(());
        }

        let element = self.element_at_mut(&range.start.path)?;
        let start = element.split_at(range.start.offset);
        let end = element.split_at(range.end.offset);
        for child in &mut element.children[start..end] {
            if let ModelNode::Text(text) = child {
                update(text);
            }
        }
        element.normalize();

        self.version += 1;
        self.mark_changed(&range.start);
        self.refresh_selection_attributes();
        Ok(())
    }

    /// Move the selection. Selection attributes are recomputed from the text
    /// around it.
    pub fn set_selection(&mut self, selection: ModelSelection) -> Result<(), ModelError> {
        self.check_position(selection.anchor())?;
        self.check_position(selection.focus())?;
        self.selection = selection;
        self.refresh_selection_attributes();
        self.changes.selection = true;
        Ok(())
    }

    /// Override one selection attribute without moving the selection.
    pub fn set_selection_attribute(&mut self, key: &str, value: &str) {
        self.selection
            .attributes
            .insert(key.to_string(), value.to_string());
        self.changes.selection = true;
    }

    pub fn remove_selection_attribute(&mut self, key: &str) {
        self.selection.attributes.remove(key);
        self.changes.selection = true;
    }

    pub fn add_marker(&mut self, name: &str, range: ModelRange) -> Result<(), ModelError> {
        self.check_range(&range)?;
        self.mark_changed(&range.start);
        if let Some(previous) = self.markers.insert(name.to_string(), range) {
            self.mark_changed(&previous.start);
        }
        Ok(())
    }

    pub fn remove_marker(&mut self, name: &str) -> Option<ModelRange> {
        let removed = self.markers.remove(name)?;
        self.mark_changed(&removed.start);
        Some(removed)
    }

    /// Hand the accumulated changes to the renderer and start a new batch.
    pub fn take_changes(&mut self) -> Changes {
        std::mem::take(&mut self.changes)
    }

    fn check_inline_parent(&self, position: &Position, name: &str) -> Result<(), ModelError> {
        if position.path.len() == 1 {
            Ok(())
        } else {
            Err(ModelError::ElementNotAllowed(name.to_string()))
        }
    }

    fn mark_changed(&mut self, position: &Position) {
        if let Some(block) = position.block() {
            self.changes.blocks.insert(block);
        }
    }

    fn after_insert(&mut self, at: &Position, len: usize) {
        for range in self.markers.values_mut() {
            shift_for_insert(&mut range.start, at, len, false);
            shift_for_insert(&mut range.end, at, len, true);
        }
        self.selection
            .map_positions(|position| shift_for_insert(position, at, len, false));

        self.version += 1;
        self.mark_changed(at);
        self.refresh_selection_attributes();
    }

    fn after_remove(&mut self, removed: &ModelRange) {
        for range in self.markers.values_mut() {
            shift_for_remove(&mut range.start, removed);
            shift_for_remove(&mut range.end, removed);
        }
        self.markers.retain(|_, range| !range.is_collapsed());
        self.selection
            .map_positions(|position| shift_for_remove(position, removed));

        self.version += 1;
        self.mark_changed(&removed.start);
        self.refresh_selection_attributes();
    }

    fn refresh_selection_attributes(&mut self) {
        self.selection.attributes = self.surrounding_attributes();
    }

    /// Attributes a selection takes from its surroundings: the node before a
    /// caret (or after it at the start of a block), or the first text node of
    /// a non-collapsed range.
    fn surrounding_attributes(&self) -> Attributes {
        if self.selection.is_collapsed() {
            let position = self.selection.focus();
            return match self.node_before(position) {
                Some(ModelNode::Text(text)) => text.attributes.clone(),
                Some(ModelNode::Element(_)) => Attributes::new(),
                None => self
                    .node_after(position)
                    .and_then(ModelNode::as_text)
                    .map(|text| text.attributes.clone())
                    .unwrap_or_default(),
            };
        }

        let range = self.selection.range();
        let Ok(element) = self.element_at(&range.start.path) else {
            return Attributes::new();
        };
        element
            .child_spans()
            .filter(|span| span.start < range.end.offset && span.end > range.start.offset)
            .find_map(|span| element.children[span.index].as_text())
            .map(|text| text.attributes.clone())
            .unwrap_or_default()
    }
}

fn shift_for_insert(position: &mut Position, at: &Position, len: usize, sticky: bool) {
    if position.path == at.path
        && (position.offset > at.offset || (sticky && position.offset == at.offset))
    {
        position.offset += len;
    }
}

fn shift_for_remove(position: &mut Position, removed: &ModelRange) {
    if position.path != removed.start.path {
        return;
    }
    if position.offset >= removed.end.offset {
        position.offset -= removed.len();
    } else if position.offset > removed.start.offset {
        position.offset = removed.start.offset;
    }
}
