use crate::model::{Attributes, ModelRange, Position};

/// The document selection: anchor, focus and the attributes that text typed
/// at the selection receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    anchor: Position,
    focus: Position,
    pub(crate) attributes: Attributes,
}

impl ModelSelection {
    pub fn collapsed(position: Position) -> Self {
        Self {
            anchor: position.clone(),
            focus: position,
            attributes: Attributes::new(),
        }
    }

    pub fn new(anchor: Position, focus: Position) -> Self {
        Self {
            anchor,
            focus,
            attributes: Attributes::new(),
        }
    }

    pub fn from_range(range: &ModelRange) -> Self {
        Self::new(range.start.clone(), range.end.clone())
    }

    pub fn anchor(&self) -> &Position {
        &self.anchor
    }

    pub fn focus(&self) -> &Position {
        &self.focus
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn first_position(&self) -> &Position {
        std::cmp::min(&self.anchor, &self.focus)
    }

    pub fn last_position(&self) -> &Position {
        std::cmp::max(&self.anchor, &self.focus)
    }

    pub fn range(&self) -> ModelRange {
        ModelRange::new(self.anchor.clone(), self.focus.clone())
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub(crate) fn map_positions(&mut self, mut map: impl FnMut(&mut Position)) {
        map(&mut self.anchor);
        map(&mut self.focus);
    }
}

impl Default for ModelSelection {
    fn default() -> Self {
        Self::collapsed(Position::in_block(0, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_selection_orders_positions() {
        let selection = ModelSelection::new(Position::in_block(0, 7), Position::in_block(0, 3));

        assert!(!selection.is_collapsed());
        assert_eq!(selection.first_position().offset, 3);
        assert_eq!(selection.last_position().offset, 7);
        assert_eq!(selection.range(), ModelRange::in_block(0, 3, 7));
    }

    #[test]
    fn test_collapsed_selection_has_no_attributes() {
        let selection = ModelSelection::collapsed(Position::in_block(0, 1));
        assert!(selection.is_collapsed());
        assert!(!selection.has_attribute("internalLinkId"));
    }
}
