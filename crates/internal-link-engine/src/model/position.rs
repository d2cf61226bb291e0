use std::fmt;

/// A place between two offsets of one model element.
///
/// `path` addresses the parent element from the root (`[2]` is the third
/// block), `offset` counts characters of text and one per inline element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Position {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Position inside the top-level block at `block`.
    pub fn in_block(block: usize, offset: usize) -> Self {
        Self::new(vec![block], offset)
    }

    pub fn with_offset(&self, offset: usize) -> Self {
        Self::new(self.path.clone(), offset)
    }

    pub fn has_same_parent(&self, other: &Position) -> bool {
        self.path == other.path
    }

    /// Top-level block this position lives in, if any.
    pub fn block(&self) -> Option<usize> {
        self.path.first().copied()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.path, self.offset)
    }
}

/// Ordered pair of positions in one parent. A value; never kept across edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelRange {
    pub start: Position,
    pub end: Position,
}

impl ModelRange {
    /// Build a range, swapping the ends when given in reverse order.
    pub fn new(a: Position, b: Position) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position.clone(),
            end: position,
        }
    }

    /// Range within the top-level block at `block`.
    pub fn in_block(block: usize, start: usize, end: usize) -> Self {
        Self::new(Position::in_block(block, start), Position::in_block(block, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_flat(&self) -> bool {
        self.start.has_same_parent(&self.end)
    }

    /// Length in offsets when both ends share a parent.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ModelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_orders_ends() {
        let range = ModelRange::new(Position::in_block(0, 5), Position::in_block(0, 2));
        assert_eq!(range.start.offset, 2);
        assert_eq!(range.end.offset, 5);
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_collapsed_range() {
        let range = ModelRange::collapsed(Position::in_block(1, 4));
        assert!(range.is_collapsed());
        assert!(range.is_empty());
        assert!(range.is_flat());
    }

    #[test]
    fn test_positions_in_different_blocks_are_not_flat() {
        let range = ModelRange::new(Position::in_block(0, 5), Position::in_block(1, 0));
        assert!(!range.is_flat());
        assert_eq!(range.to_string(), "[[0]:5, [1]:0]");
    }
}
