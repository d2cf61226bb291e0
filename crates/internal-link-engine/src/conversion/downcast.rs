use std::collections::BTreeMap;

use crate::model::{Attributes, ModelElement, ModelNode};
use crate::view::{ElementKind, ViewElement, ViewNodeId, ViewWriter};

/// Text attribute rendered as an attribute element built from its value.
pub struct AttributeToElement {
    pub model_key: String,
    pub view: Box<dyn Fn(&str) -> ViewElement>,
}

/// Model element rendered as a view element with a fixed name.
#[derive(Debug, Clone)]
pub struct ElementToElement {
    pub view: String,
    pub kind: ElementKind,
}

/// A zero-length editing-only element placed at a model offset of a block.
#[derive(Debug, Clone)]
pub struct UiSlot {
    pub offset: usize,
    pub element: ViewElement,
}

#[derive(Default)]
pub struct DowncastRules {
    pub(crate) elements: BTreeMap<String, ElementToElement>,
    pub(crate) attributes: Vec<AttributeToElement>,
}

enum Leaf {
    Text(String),
    Element(ViewElement),
}

/// One leaf with the wrappers it needs, outermost first.
struct Item {
    chain: Vec<ViewElement>,
    leaf: Leaf,
}

impl DowncastRules {
    /// Wrappers for a text node, outermost first: ascending priority, then
    /// name, so the order never depends on attribute or rule order.
    pub fn wrappers_for(&self, attributes: &Attributes) -> Vec<ViewElement> {
        let mut wrappers: Vec<ViewElement> = self
            .attributes
            .iter()
            .filter_map(|rule| {
                attributes
                    .get(&rule.model_key)
                    .map(|value| (rule.view)(value))
            })
            .collect();
        wrappers.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        wrappers
    }

    pub fn element_for(&self, element: &ModelElement) -> Option<ViewElement> {
        self.elements
            .get(&element.name)
            .map(|rule| ViewElement::new(rule.view.as_str(), rule.kind))
    }

    /// Render `block` and its inline content as child `index` of `parent`.
    ///
    /// `ui` must be sorted by offset. Returns `None` when no rule exists for
    /// the block.
    pub fn render_block(
        &self,
        block: &ModelElement,
        ui: &[UiSlot],
        writer: &mut ViewWriter<'_>,
        parent: ViewNodeId,
        index: usize,
    ) -> Option<ViewNodeId> {
        let Some(container) = self.element_for(block) else {
            log::warn!("No downcast rule for block `{}`, skipping it", block.name);
            return None;
        };
        let id = writer.insert_element(parent, index, container);
        emit(writer, id, self.inline_items(block, ui));
        Some(id)
    }

    fn inline_items(&self, block: &ModelElement, ui: &[UiSlot]) -> Vec<Item> {
        let mut items = Vec::with_capacity(block.children.len());
        let mut slots = ui.iter().peekable();
        let mut offset = 0;

        for child in &block.children {
            let size = child.offset_size();
            match child {
                ModelNode::Text(text) => {
                    let chain = self.wrappers_for(&text.attributes);
                    let chars: Vec<char> = text.data.chars().collect();
                    let mut piece_start = 0;
                    while piece_start < size {
                        push_ui_upto(&mut slots, offset + piece_start, &mut items);
                        let piece_end = slots
                            .peek()
                            .map(|slot| slot.offset - offset)
                            .filter(|&end| end < size)
                            .unwrap_or(size);
                        items.push(Item {
                            chain: chain.clone(),
                            leaf: Leaf::Text(chars[piece_start..piece_end].iter().collect()),
                        });
                        piece_start = piece_end;
                    }
                }
                ModelNode::Element(element) => {
                    push_ui_upto(&mut slots, offset, &mut items);
                    let view = self.element_for(element).unwrap_or_else(|| {
                        log::warn!("No downcast rule for inline `{}`", element.name);
                        ViewElement::empty(element.name.as_str())
                    });
                    items.push(Item {
                        chain: Vec::new(),
                        leaf: Leaf::Element(view),
                    });
                }
            }
            offset += size;
        }
        push_ui_upto(&mut slots, usize::MAX, &mut items);
        items
    }
}

fn push_ui_upto<'a>(
    slots: &mut std::iter::Peekable<impl Iterator<Item = &'a UiSlot>>,
    offset: usize,
    items: &mut Vec<Item>,
) {
    while let Some(slot) = slots.next_if(|slot| slot.offset <= offset) {
        items.push(Item {
            chain: Vec::new(),
            leaf: Leaf::Element(slot.element.clone()),
        });
    }
}

/// Write items under `parent`, merging consecutive items that start with a
/// similar wrapper into one wrapper element.
fn emit(writer: &mut ViewWriter<'_>, parent: ViewNodeId, items: Vec<Item>) {
    let mut items = items.into_iter().peekable();
    while let Some(mut item) = items.next() {
        if item.chain.is_empty() {
            match item.leaf {
                Leaf::Text(text) => writer.append_text(parent, &text),
                Leaf::Element(element) => writer.append_element(parent, element),
            };
            continue;
        }

        let wrapper = item.chain.remove(0);
        let mut group = vec![item];
        while let Some(mut next) = items.next_if(|next| {
            next.chain
                .first()
                .is_some_and(|first| first.is_similar(&wrapper))
        }) {
            next.chain.remove(0);
            group.push(next);
        }

        let id = writer.append_element(parent, wrapper);
        emit(writer, id, group);
    }
}
