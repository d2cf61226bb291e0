//! # Editor
//!
//! Owns one document, its schema and conversion rules, the editing view and
//! the link feature. Every public mutation ends with a render cycle that
//! brings the editing view up to date:
//!
//! 1. the link highlight is removed
//! 2. changed blocks are converted again (all of them after `set_data`)
//! 3. the link highlight is applied for the new selection
//!
//! All three steps run in one view transaction.

use serde::{Deserialize, Serialize};

use crate::basics::{self, PARAGRAPH};
use crate::conversion::{Conversion, DataError, EditingController, Mapper, Pipeline, data, editing};
use crate::link::{InternalLinkEditing, LinkHighlighter};
use crate::model::{
    Attributes, ModelDocument, ModelElement, ModelError, ModelRange, ModelSelection, Position,
    Schema,
};
use crate::typing::{CaretDirection, CaretMove, CaretState, TwoStepCaretMovement};
use crate::view::{ViewNodeId, ViewTree};

/// Editor options, usually read from the `[link]` table of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Mark the link holding the selection with `ck-link_selected`
    pub highlight_selected_link: bool,
    /// Template turning a link id into a URL, e.g. `/notes/{id}`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
    pub url_placeholder: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            highlight_selected_link: true,
            url_template: None,
            url_placeholder: "{id}".to_string(),
        }
    }
}

pub struct Editor {
    pub(crate) model: ModelDocument,
    pub(crate) schema: Schema,
    conversion: Conversion,
    editing: EditingController,
    two_step: TwoStepCaretMovement,
    link: InternalLinkEditing,
    highlighter: LinkHighlighter,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Editor {
    /// Editor holding a single empty paragraph.
    pub fn new(config: &EditorConfig) -> Self {
        let mut schema = Schema::new();
        let mut conversion = Conversion::new();
        let mut two_step = TwoStepCaretMovement::new();

        basics::init(&mut schema, &mut conversion);
        let link = InternalLinkEditing::new(config);
        link.init(&mut schema, &mut conversion, &mut two_step);
        let highlighter = link.highlighter();

        let mut editor = Self {
            model: ModelDocument::new(),
            schema,
            conversion,
            editing: EditingController::new(),
            two_step,
            link,
            highlighter,
        };
        editor.model.replace_content(vec![ModelElement::new(PARAGRAPH).into()]);
        editor.after_edit();
        editor
    }

    /// Replace the document with parsed `markup`. The caret goes to the
    /// start of the first block.
    pub fn set_data(&mut self, markup: &str) -> Result<(), DataError> {
        let mut blocks = data::parse(markup, self.conversion.upcast_rules(), &self.schema)?;
        if blocks.is_empty() {
            blocks.push(ModelElement::new(PARAGRAPH).into());
        }
        log::debug!("Loaded {} block(s)", blocks.len());

        self.model.replace_content(blocks);
        self.after_edit();
        Ok(())
    }

    /// The persisted form of the document. Editing-only state such as the
    /// link highlight or markers never appears here.
    pub fn get_data(&self) -> String {
        data::stringify(self.model.root(), self.conversion.downcast_rules(Pipeline::Data))
    }

    pub fn model(&self) -> &ModelDocument {
        &self.model
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn view(&self) -> &ViewTree {
        self.editing.view()
    }

    pub fn mapper(&self) -> &Mapper {
        self.editing.mapper()
    }

    pub fn link(&self) -> &InternalLinkEditing {
        &self.link
    }

    /// Link wrappers currently carrying the highlight class.
    pub fn highlighted_links(&self) -> Vec<ViewNodeId> {
        self.highlighter.highlighted().iter().copied().collect()
    }

    pub fn caret_state(&self) -> CaretState {
        self.two_step.state()
    }

    pub fn set_selection(&mut self, selection: ModelSelection) -> Result<(), ModelError> {
        self.model.set_selection(selection)?;
        self.after_edit();
        Ok(())
    }

    /// Arrow key: collapse a range, step over a link boundary or move the
    /// caret by one offset.
    pub fn move_caret(&mut self, direction: CaretDirection) -> Result<CaretMove, ModelError> {
        let outcome = self.two_step.handle(&mut self.model, direction)?;
        self.render();
        Ok(outcome)
    }

    /// Shift+arrow: move the focus by one offset within its block.
    pub fn extend_selection(&mut self, direction: CaretDirection) -> Result<CaretMove, ModelError> {
        let selection = self.model.selection();
        let focus = selection.focus();
        let max = self.model.element_at(&focus.path)?.max_offset();
        let offset = match direction {
            CaretDirection::Forward if focus.offset < max => focus.offset + 1,
            CaretDirection::Backward if focus.offset > 0 => focus.offset - 1,
            _ => return Ok(CaretMove::Blocked),
        };
        let extended = ModelSelection::new(selection.anchor().clone(), focus.with_offset(offset));
        self.set_selection(extended)?;
        Ok(CaretMove::Moved)
    }

    /// Type `text` at the selection, replacing a selected range. The text
    /// takes the selection attributes, so whether it joins a link depends on
    /// the caret state.
    pub fn type_text(&mut self, text: &str) -> Result<(), ModelError> {
        let range = self.model.selection().range();
        let attributes = self.model.selection().attributes().clone();
        self.model.remove(&range)?;

        let inserted = self
            .model
            .insert_text(&range.start, text, attributes, &self.schema)?;
        self.model
            .set_selection(ModelSelection::collapsed(inserted.end))?;
        self.after_edit();
        Ok(())
    }

    /// Backspace. Returns `false` when there was nothing to delete.
    pub fn delete_backward(&mut self) -> Result<bool, ModelError> {
        let selection = self.model.selection();
        let range = if selection.is_collapsed() {
            let caret = selection.focus();
            if caret.offset == 0 {
                return Ok(false);
            }
            ModelRange::new(caret.with_offset(caret.offset - 1), caret.clone())
        } else {
            selection.range()
        };

        self.model.remove(&range)?;
        self.after_edit();
        Ok(true)
    }

    pub fn insert_text(
        &mut self,
        position: &Position,
        text: &str,
        attributes: Attributes,
    ) -> Result<ModelRange, ModelError> {
        let range = self
            .model
            .insert_text(position, text, attributes, &self.schema)?;
        self.after_edit();
        Ok(range)
    }

    pub fn insert_element(&mut self, position: &Position, element: ModelElement) -> Result<(), ModelError> {
        self.model.insert_element(position, element, &self.schema)?;
        self.after_edit();
        Ok(())
    }

    pub fn remove(&mut self, range: &ModelRange) -> Result<(), ModelError> {
        self.model.remove(range)?;
        self.after_edit();
        Ok(())
    }

    pub fn set_attribute(&mut self, range: &ModelRange, key: &str, value: &str) -> Result<(), ModelError> {
        self.model.set_attribute(range, key, value, &self.schema)?;
        self.after_edit();
        Ok(())
    }

    pub fn remove_attribute(&mut self, range: &ModelRange, key: &str) -> Result<(), ModelError> {
        self.model.remove_attribute(range, key)?;
        self.after_edit();
        Ok(())
    }

    /// Add or move the editing-only marker `name`.
    pub fn add_marker(&mut self, name: &str, range: ModelRange) -> Result<(), ModelError> {
        self.model.add_marker(name, range)?;
        self.render();
        Ok(())
    }

    pub fn remove_marker(&mut self, name: &str) -> Option<ModelRange> {
        let removed = self.model.remove_marker(name);
        self.render();
        removed
    }

    /// Run one render cycle for the changes recorded since the last one.
    pub(crate) fn render(&mut self) {
        let changes = self.model.take_changes();
        if changes.is_empty() {
            return;
        }

        let rules = self.conversion.downcast_rules(Pipeline::Editing);
        let model = &self.model;
        let highlighter = &mut self.highlighter;
        let (view, mapper) = self.editing.parts_mut();
        let rendered = view.change(|writer| {
            highlighter.remove_highlight(writer);
            let rendered = editing::convert_changes(rules, model, &changes, writer, mapper);
            highlighter.apply_highlight(model, mapper, writer);
            rendered
        });

        log::debug!(
            "Render cycle: {rendered} block(s) converted, {} link wrapper(s) highlighted",
            self.highlighter.highlighted().len()
        );
    }

    /// Render after an edit that may have moved the selection or changed the
    /// text around it.
    pub(crate) fn after_edit(&mut self) {
        self.two_step.reset(&self.model);
        self.render();
    }
}
