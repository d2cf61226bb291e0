//! The editing pipeline: keeps the long-lived editing view in sync with the
//! model, one changed block at a time.

use crate::conversion::{DowncastRules, Mapper, downcast::UiSlot};
use crate::model::{Changes, ModelDocument, ModelNode};
use crate::view::{ViewElement, ViewTree, ViewWriter};

pub const MARKER_ELEMENT: &str = "marker";

/// Owns the editing view and the model-to-view bindings.
#[derive(Debug, Clone, Default)]
pub struct EditingController {
    view: ViewTree,
    mapper: Mapper,
}

impl EditingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    /// Borrow the view and the mapper at once, so a view transaction can
    /// update bindings while it runs.
    pub fn parts_mut(&mut self) -> (&mut ViewTree, &mut Mapper) {
        (&mut self.view, &mut self.mapper)
    }
}

/// Bring the view in line with `changes`. Returns the number of blocks
/// rendered.
///
/// A structural change rebuilds every block; otherwise only the blocks
/// listed in `changes` are replaced in place.
pub fn convert_changes(
    rules: &DowncastRules,
    model: &ModelDocument,
    changes: &Changes,
    writer: &mut ViewWriter<'_>,
    mapper: &mut Mapper,
) -> usize {
    let root = writer.tree().root();

    if changes.structure {
        let stale = writer.tree().children(root).to_vec();
        for id in stale {
            writer.remove(id);
        }
        mapper.clear();

        let mut rendered = 0;
        for (index, block) in model.root().children.iter().enumerate() {
            let Some(block) = block.as_element() else {
                continue;
            };
            let slots = marker_slots(model, index);
            if let Some(id) = rules.render_block(block, &slots, writer, root, rendered) {
                mapper.bind(vec![index], id);
                rendered += 1;
            }
        }
        return rendered;
    }

    let mut rendered = 0;
    for &index in &changes.blocks {
        let Some(old) = mapper.to_view_element(&[index]) else {
            log::debug!("Block {index} has no view, nothing to re-render");
            continue;
        };
        let Some(block) = model.root().children.get(index).and_then(ModelNode::as_element) else {
            continue;
        };
        let Some(position) = writer.tree().children(root).iter().position(|&id| id == old) else {
            continue;
        };

        writer.remove(old);
        mapper.unbind(&[index]);
        let slots = marker_slots(model, index);
        if let Some(id) = rules.render_block(block, &slots, writer, root, position) {
            mapper.bind(vec![index], id);
            rendered += 1;
        }
    }
    rendered
}

/// Boundary elements of every marker touching block `index`, sorted by
/// offset.
fn marker_slots(model: &ModelDocument, index: usize) -> Vec<UiSlot> {
    let mut slots = Vec::new();
    for (name, range) in model.markers() {
        for (position, boundary) in [(&range.start, "start"), (&range.end, "end")] {
            if position.block() == Some(index) {
                slots.push(UiSlot {
                    offset: position.offset,
                    element: ViewElement::ui(MARKER_ELEMENT)
                        .with_attribute("data-marker", name)
                        .with_attribute("data-boundary", boundary),
                });
            }
        }
    }
    slots.sort_by_key(|slot| slot.offset);
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ElementToElement;
    use crate::model::{ModelElement, ModelRange, ModelText, Position, Schema};
    use crate::view::{ElementKind, markup};
    use pretty_assertions::assert_eq;

    fn rules() -> DowncastRules {
        let mut rules = DowncastRules::default();
        rules.elements.insert(
            "paragraph".into(),
            ElementToElement {
                view: "p".into(),
                kind: ElementKind::Container,
            },
        );
        rules
    }

    fn schema() -> Schema {
        let mut schema = Schema::new();
        schema.register_block("paragraph");
        schema
    }

    fn render(controller: &mut EditingController, model: &mut ModelDocument) -> usize {
        let changes = model.take_changes();
        let rules = rules();
        let (view, mapper) = controller.parts_mut();
        view.change(|writer| convert_changes(&rules, model, &changes, writer, mapper))
    }

    fn document() -> ModelDocument {
        let mut model = ModelDocument::new();
        model.replace_content(vec![
            ModelElement::new("paragraph")
                .with_children([ModelText::new("one").into()])
                .into(),
            ModelElement::new("paragraph")
                .with_children([ModelText::new("two").into()])
                .into(),
        ]);
        model
    }

    #[test]
    fn test_structure_change_renders_every_block() {
        let mut controller = EditingController::new();
        let mut model = document();

        assert_eq!(render(&mut controller, &mut model), 2);
        assert_eq!(markup::stringify(controller.view()), "<p>one</p><p>two</p>");
        assert!(controller.mapper().to_view_element(&[1]).is_some());
    }

    #[test]
    fn test_only_changed_block_is_replaced() {
        let mut controller = EditingController::new();
        let mut model = document();
        render(&mut controller, &mut model);
        let first = controller.mapper().to_view_element(&[0]);

        model
            .insert_text(&Position::in_block(1, 3), "!", Default::default(), &schema())
            .unwrap();
        assert_eq!(render(&mut controller, &mut model), 1);

        assert_eq!(markup::stringify(controller.view()), "<p>one</p><p>two!</p>");
        assert_eq!(controller.mapper().to_view_element(&[0]), first);
    }

    #[test]
    fn test_markers_render_as_ui_elements() {
        let mut controller = EditingController::new();
        let mut model = document();
        model.add_marker("search", ModelRange::in_block(0, 1, 2)).unwrap();

        render(&mut controller, &mut model);

        assert_eq!(
            markup::stringify(controller.view()),
            concat!(
                r#"<p>o<marker data-boundary="start" data-marker="search"/>n"#,
                r#"<marker data-boundary="end" data-marker="search"/>e</p><p>two</p>"#
            )
        );
    }
}
