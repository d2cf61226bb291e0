use crate::view::{ElementKind, ViewElement, ViewNode, ViewNodeData, ViewNodeId, ViewWriter};

/// A span inside one container element, measured in model offsets: a
/// character counts one, an empty element counts one, UI elements count zero
/// and wrappers are transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRange {
    pub container: ViewNodeId,
    pub start: usize,
    pub end: usize,
}

/// Arena-backed view tree.
///
/// Nodes are only mutated through a [`ViewWriter`] obtained from
/// [`ViewTree::change`]; removed nodes leave a tombstone so ids stay unique.
#[derive(Debug, Clone)]
pub struct ViewTree {
    nodes: Vec<Option<ViewNode>>,
    root: ViewNodeId,
    pub(crate) changing: bool,
    pub(crate) revision: u64,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        let root = ViewNode {
            data: ViewNodeData::Root,
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![Some(root)],
            root: ViewNodeId(0),
            changing: false,
            revision: 0,
        }
    }

    /// Run `callback` inside a view transaction. The transaction ends when
    /// the writer is dropped, including on early return or unwinding.
    pub fn change<R>(&mut self, callback: impl FnOnce(&mut ViewWriter<'_>) -> R) -> R {
        let mut writer = ViewWriter::new(self);
        callback(&mut writer)
    }

    pub fn is_changing(&self) -> bool {
        self.changing
    }

    /// Number of completed transactions.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn root(&self) -> ViewNodeId {
        self.root
    }

    pub fn get(&self, id: ViewNodeId) -> Option<&ViewNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: ViewNodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn element(&self, id: ViewNodeId) -> Option<&ViewElement> {
        self.get(id).and_then(ViewNode::as_element)
    }

    pub fn children(&self, id: ViewNodeId) -> &[ViewNodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    pub fn parent(&self, id: ViewNodeId) -> Option<ViewNodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// All live nodes below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: ViewNodeId) -> Vec<ViewNodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<ViewNodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Length of a node in model offsets.
    pub fn offset_size(&self, id: ViewNodeId) -> usize {
        match self.get(id).map(|node| &node.data) {
            Some(ViewNodeData::Text(text)) => text.chars().count(),
            Some(ViewNodeData::Element(element)) => match element.kind {
                ElementKind::Empty => 1,
                ElementKind::Ui => 0,
                ElementKind::Container | ElementKind::Attribute(_) => self
                    .children(id)
                    .iter()
                    .map(|&child| self.offset_size(child))
                    .sum(),
            },
            Some(ViewNodeData::Root) => self
                .children(id)
                .iter()
                .map(|&child| self.offset_size(child))
                .sum(),
            None => 0,
        }
    }

    /// Nodes below `range.container` that overlap the range, in document
    /// order. Zero-length nodes never overlap.
    pub fn items_in_range(&self, range: &ViewRange) -> Vec<ViewNodeId> {
        let mut items = Vec::new();
        let mut offset = 0;
        for &child in self.children(range.container) {
            self.collect_items(child, &mut offset, range, &mut items);
        }
        items
    }

    fn collect_items(
        &self,
        id: ViewNodeId,
        offset: &mut usize,
        range: &ViewRange,
        items: &mut Vec<ViewNodeId>,
    ) {
        let start = *offset;
        let end = start + self.offset_size(id);
        if start < end && start < range.end && end > range.start {
            items.push(id);
            for &child in self.children(id) {
                self.collect_items(child, offset, range, items);
            }
        }
        *offset = end;
    }

    /// Concatenated text below `id`.
    pub fn text_content(&self, id: ViewNodeId) -> String {
        match self.get(id).map(|node| &node.data) {
            Some(ViewNodeData::Text(text)) => text.clone(),
            Some(_) => self
                .children(id)
                .iter()
                .map(|&child| self.text_content(child))
                .collect(),
            None => String::new(),
        }
    }

    pub(crate) fn alloc(&mut self, data: ViewNodeData) -> ViewNodeId {
        let id = ViewNodeId(self.nodes.len());
        self.nodes.push(Some(ViewNode {
            data,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    pub(crate) fn node_mut(&mut self, id: ViewNodeId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub(crate) fn insert_child(&mut self, parent: ViewNodeId, index: usize, child: ViewNodeId) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
    }

    /// Detach `id` from its parent and free the whole subtree.
    pub(crate) fn remove_subtree(&mut self, id: ViewNodeId) {
        if let Some(parent) = self.parent(id)
            && let Some(node) = self.node_mut(parent)
        {
            node.children.retain(|&child| child != id);
        }
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            if let Some(slot) = self.nodes.get_mut(node.0) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::WrapperKind;

    /// `<p>ab<a>cd<ui/>ef</a><br/>g</p>`
    fn sample() -> (ViewTree, ViewNodeId, ViewNodeId) {
        let mut tree = ViewTree::new();
        let root = tree.root();
        let (paragraph, link) = tree.change(|writer| {
            let paragraph = writer.append_element(root, ViewElement::container("p"));
            writer.append_text(paragraph, "ab");
            let link = writer.append_element(
                paragraph,
                ViewElement::attribute("a", WrapperKind::InternalLink, 5),
            );
            writer.append_text(link, "cd");
            writer.append_element(link, ViewElement::ui("ui"));
            writer.append_text(link, "ef");
            writer.append_element(paragraph, ViewElement::empty("br"));
            writer.append_text(paragraph, "g");
            (paragraph, link)
        });
        (tree, paragraph, link)
    }

    #[test]
    fn test_offset_size_skips_ui_elements() {
        let (tree, paragraph, link) = sample();
        assert_eq!(tree.offset_size(link), 4);
        assert_eq!(tree.offset_size(paragraph), 8);
    }

    #[test]
    fn test_items_in_range() {
        let (tree, paragraph, link) = sample();
        let range = ViewRange {
            container: paragraph,
            start: 2,
            end: 6,
        };

        let items = tree.items_in_range(&range);

        assert_eq!(items.first(), Some(&link));
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|&id| tree.element(id).is_none_or(|e| e.kind != ElementKind::Ui)));
    }

    #[test]
    fn test_items_in_range_excludes_touching_nodes() {
        let (tree, paragraph, _) = sample();
        let range = ViewRange {
            container: paragraph,
            start: 6,
            end: 7,
        };

        let items = tree.items_in_range(&range);

        assert_eq!(items.len(), 1);
        assert_eq!(tree.element(items[0]).map(|e| e.name.as_str()), Some("br"));
    }

    #[test]
    fn test_remove_subtree_frees_ids() {
        let (mut tree, paragraph, link) = sample();
        tree.change(|writer| writer.remove(link));

        assert!(!tree.contains(link));
        assert_eq!(tree.text_content(paragraph), "abg");
        assert_eq!(tree.descendants(paragraph).len(), 3);
    }

    #[test]
    fn test_change_releases_transaction() {
        let (mut tree, paragraph, _) = sample();
        let revision = tree.revision();

        let result: Result<(), &str> = tree.change(|writer| {
            assert!(writer.tree().is_changing());
            writer.append_text(paragraph, "x");
            let missing: Option<ViewNodeId> = None;
            let target = missing.ok_or("early exit")?;
            writer.append_text(target, "never");
            Ok(())
        });

        assert!(result.is_err());
        assert!(!tree.is_changing());
        assert_eq!(tree.revision(), revision + 1);
        assert!(tree.text_content(paragraph).ends_with("gx"));
    }
}
