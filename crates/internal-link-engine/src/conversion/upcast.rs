use std::collections::BTreeMap;

use crate::model::{Attributes, ModelElement, ModelNode, ModelText, Schema};
use crate::view::{ViewElement, ViewNodeData, ViewNodeId, ViewTree};

/// Matches a view element by name and by the presence of attributes.
#[derive(Debug, Clone)]
pub struct ViewMatcher {
    pub name: String,
    pub attributes: Vec<String>,
}

impl ViewMatcher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    /// Require `key` to be present, whatever its value.
    pub fn with_attribute(mut self, key: &str) -> Self {
        self.attributes.push(key.to_string());
        self
    }

    pub fn matches(&self, element: &ViewElement) -> bool {
        element.name == self.name && self.attributes.iter().all(|key| element.has_attribute(key))
    }
}

/// A view element whose content becomes text carrying `model_key`.
pub struct ElementToAttribute {
    pub view: ViewMatcher,
    pub model_key: String,
    pub value: Box<dyn Fn(&ViewElement) -> Option<String>>,
}

impl ElementToAttribute {
    pub fn new(
        view: ViewMatcher,
        model_key: &str,
        value: impl Fn(&ViewElement) -> Option<String> + 'static,
    ) -> Self {
        Self {
            view,
            model_key: model_key.to_string(),
            value: Box::new(value),
        }
    }
}

#[derive(Default)]
pub struct UpcastRules {
    /// View element name to model element name
    pub(crate) elements: BTreeMap<String, String>,
    pub(crate) attributes: Vec<ElementToAttribute>,
    /// Block created around inline content found directly under the root
    pub(crate) auto_paragraph: Option<String>,
}

impl UpcastRules {
    pub fn set_auto_paragraph(&mut self, name: &str) {
        self.auto_paragraph = Some(name.to_string());
    }

    /// Convert the children of the view root into model blocks.
    pub fn upcast(&self, tree: &ViewTree, schema: &Schema) -> Vec<ModelNode> {
        let mut blocks = Vec::new();
        let mut pending: Option<ModelElement> = None;

        for &child in tree.children(tree.root()) {
            let block_name = tree
                .element(child)
                .and_then(|element| self.elements.get(&element.name))
                .filter(|name| schema.is_block(name));

            if let Some(name) = block_name {
                if let Some(block) = pending.take() {
                    blocks.push(finish_block(block));
                }
                let mut block = ModelElement::new(name.as_str());
                for &inline in tree.children(child) {
                    self.convert_inline(tree, schema, inline, &Attributes::new(), &mut block.children);
                }
                blocks.push(finish_block(block));
                continue;
            }

            match &self.auto_paragraph {
                Some(name) => {
                    let block = pending.get_or_insert_with(|| ModelElement::new(name.as_str()));
                    self.convert_inline(tree, schema, child, &Attributes::new(), &mut block.children);
                }
                None => log::warn!("Dropping inline content outside of a block"),
            }
        }

        if let Some(block) = pending {
            blocks.push(finish_block(block));
        }
        blocks
    }

    fn convert_inline(
        &self,
        tree: &ViewTree,
        schema: &Schema,
        id: ViewNodeId,
        attributes: &Attributes,
        out: &mut Vec<ModelNode>,
    ) {
        let Some(node) = tree.get(id) else {
            return;
        };
        let element = match &node.data {
            ViewNodeData::Text(text) => {
                out.push(ModelNode::Text(ModelText {
                    data: text.clone(),
                    attributes: attributes.clone(),
                }));
                return;
            }
            ViewNodeData::Element(element) => element,
            ViewNodeData::Root => return,
        };

        if let Some(name) = self.elements.get(&element.name)
            && schema.is_inline(name)
        {
            out.push(ModelElement::new(name.as_str()).into());
            return;
        }

        let mut inherited = attributes.clone();
        let mut matched = false;
        for rule in &self.attributes {
            if !rule.view.matches(element) || !schema.allows_text_attribute(&rule.model_key) {
                continue;
            }
            if let Some(value) = (rule.value)(element) {
                inherited.insert(rule.model_key.clone(), value);
                matched = true;
            }
        }
        if !matched {
            log::debug!("No upcast rule for <{}>, keeping its content as text", element.name);
        }

        for &child in node.children() {
            self.convert_inline(tree, schema, child, &inherited, out);
        }
    }
}

fn finish_block(mut block: ModelElement) -> ModelNode {
    block.normalize();
    block.into()
}
