use std::collections::BTreeMap;

use crate::model::ModelRange;
use crate::view::{ViewNodeId, ViewRange};

/// Binds model blocks to the editing view containers rendered for them.
///
/// View ranges are measured in model offsets, so mapping a flat range only
/// needs the container of its parent.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    blocks: BTreeMap<Vec<usize>, ViewNodeId>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, path: Vec<usize>, view: ViewNodeId) {
        self.blocks.insert(path, view);
    }

    pub fn unbind(&mut self, path: &[usize]) -> Option<ViewNodeId> {
        self.blocks.remove(path)
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    pub fn to_view_element(&self, path: &[usize]) -> Option<ViewNodeId> {
        self.blocks.get(path).copied()
    }

    pub fn to_model_path(&self, view: ViewNodeId) -> Option<&[usize]> {
        self.blocks
            .iter()
            .find(|(_, bound)| **bound == view)
            .map(|(path, _)| path.as_slice())
    }

    pub fn to_view_range(&self, range: &ModelRange) -> Option<ViewRange> {
        if !range.is_flat() {
            return None;
        }
        let container = self.to_view_element(&range.start.path)?;
        Some(ViewRange {
            container,
            start: range.start.offset,
            end: range.end.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_range_maps_to_bound_container() {
        let mut mapper = Mapper::new();
        mapper.bind(vec![1], ViewNodeId(4));

        let range = ModelRange::in_block(1, 2, 5);
        assert_eq!(
            mapper.to_view_range(&range),
            Some(ViewRange {
                container: ViewNodeId(4),
                start: 2,
                end: 5
            })
        );
        assert_eq!(mapper.to_model_path(ViewNodeId(4)), Some([1].as_slice()));
    }

    #[test]
    fn test_unbound_or_spanning_ranges_do_not_map() {
        let mut mapper = Mapper::new();
        mapper.bind(vec![0], ViewNodeId(1));

        assert_eq!(mapper.to_view_range(&ModelRange::in_block(3, 0, 1)), None);
        let spanning = ModelRange::new(Position::in_block(0, 0), Position::in_block(1, 0));
        assert_eq!(mapper.to_view_range(&spanning), None);

        mapper.unbind(&[0]);
        assert_eq!(mapper.to_view_element(&[0]), None);
    }
}
