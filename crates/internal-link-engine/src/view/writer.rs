use crate::view::{ViewElement, ViewNodeData, ViewNodeId, ViewTree};

/// Handle for mutating a [`ViewTree`] during one transaction.
///
/// Created by [`ViewTree::change`]; dropping it closes the transaction.
pub struct ViewWriter<'a> {
    tree: &'a mut ViewTree,
}

impl<'a> ViewWriter<'a> {
    pub(crate) fn new(tree: &'a mut ViewTree) -> Self {
        tree.changing = true;
        Self { tree }
    }

    pub fn tree(&self) -> &ViewTree {
        &*self.tree
    }

    pub fn append_element(&mut self, parent: ViewNodeId, element: ViewElement) -> ViewNodeId {
        let index = self.tree.children(parent).len();
        self.insert_element(parent, index, element)
    }

    pub fn insert_element(
        &mut self,
        parent: ViewNodeId,
        index: usize,
        element: ViewElement,
    ) -> ViewNodeId {
        let id = self.tree.alloc(ViewNodeData::Element(element));
        self.tree.insert_child(parent, index, id);
        id
    }

    pub fn append_text(&mut self, parent: ViewNodeId, text: &str) -> ViewNodeId {
        let id = self.tree.alloc(ViewNodeData::Text(text.to_string()));
        let index = self.tree.children(parent).len();
        self.tree.insert_child(parent, index, id);
        id
    }

    /// Remove `id` and everything below it. Unknown ids are ignored.
    pub fn remove(&mut self, id: ViewNodeId) {
        self.tree.remove_subtree(id);
    }

    pub fn add_class(&mut self, id: ViewNodeId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    /// Remove a class. Nodes removed from the tree in the meantime are ignored.
    pub fn remove_class(&mut self, id: ViewNodeId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.remove(class);
        }
    }

    pub fn set_attribute(&mut self, id: ViewNodeId, key: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.insert(key.to_string(), value.to_string());
        }
    }

    fn element_mut(&mut self, id: ViewNodeId) -> Option<&mut ViewElement> {
        match self.tree.node_mut(id).map(|node| &mut node.data) {
            Some(ViewNodeData::Element(element)) => Some(element),
            _ => None,
        }
    }
}

impl Drop for ViewWriter<'_> {
    fn drop(&mut self) {
        self.tree.changing = false;
        self.tree.revision += 1;
    }
}
