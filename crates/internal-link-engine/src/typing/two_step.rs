use std::collections::BTreeSet;

use crate::model::{ModelDocument, ModelError, ModelSelection, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretDirection {
    Backward,
    Forward,
}

/// Where the caret is relative to the registered attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretState {
    #[default]
    Outside,
    /// At a boundary, the selection just took the value of the next run
    EnteringBoundary,
    Inside,
    /// At a boundary, the selection just dropped the value of the run left
    ExitingBoundary,
}

/// Outcome of one directional command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    /// The caret moved one offset
    Moved,
    /// The caret stayed; only the selection attributes changed
    Stepped,
    /// Nothing to move to in this direction
    Blocked,
}

/// Crossing an attribute boundary takes two key presses: the first switches
/// the selection attributes to the side the caret is heading to, the second
/// moves the caret.
///
/// A boundary is an offset where the value of a registered attribute before
/// the caret differs from the value after it. A side with no node counts as
/// having no value.
#[derive(Debug, Clone, Default)]
pub struct TwoStepCaretMovement {
    attributes: BTreeSet<String>,
    state: CaretState,
}

impl TwoStepCaretMovement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_attribute(&mut self, attribute: &str) {
        self.attributes.insert(attribute.to_string());
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    pub fn state(&self) -> CaretState {
        self.state
    }

    /// Recompute the state after the selection was changed by something
    /// other than [`handle`](Self::handle).
    pub fn reset(&mut self, model: &ModelDocument) {
        self.state = self.resting_state(model);
    }

    /// Apply one directional caret command to `model`.
    pub fn handle(
        &mut self,
        model: &mut ModelDocument,
        direction: CaretDirection,
    ) -> Result<CaretMove, ModelError> {
        let selection = model.selection();
        if !selection.is_collapsed() {
            let edge = match direction {
                CaretDirection::Backward => selection.first_position(),
                CaretDirection::Forward => selection.last_position(),
            }
            .clone();
            model.set_selection(ModelSelection::collapsed(edge))?;
            self.reset(model);
            return Ok(CaretMove::Moved);
        }

        let position = selection.focus().clone();
        if self.step_over_boundary(model, &position, direction) {
            return Ok(CaretMove::Stepped);
        }

        let max = model.element_at(&position.path)?.max_offset();
        let target = match direction {
            CaretDirection::Forward if position.offset < max => position.offset + 1,
            CaretDirection::Backward if position.offset > 0 => position.offset - 1,
            _ => return Ok(CaretMove::Blocked),
        };
        let target = position.with_offset(target);
        model.set_selection(ModelSelection::collapsed(target.clone()))?;

        if direction == CaretDirection::Backward {
            // Keep the values of the side the caret came from.
            for attribute in &self.attributes {
                match model.text_attribute_after(&target, attribute).map(str::to_string) {
                    Some(value) => model.set_selection_attribute(attribute, &value),
                    None => model.remove_selection_attribute(attribute),
                }
            }
        }

        self.state = self.resting_state(model);
        log::trace!("Caret moved {direction:?} to {target}, now {:?}", self.state);
        Ok(CaretMove::Moved)
    }

    /// Switch the selection attributes when `position` is a boundary and the
    /// selection does not carry the values of the side ahead yet.
    fn step_over_boundary(
        &mut self,
        model: &mut ModelDocument,
        position: &Position,
        direction: CaretDirection,
    ) -> bool {
        let mut updates: Vec<(String, Option<String>)> = Vec::new();
        for attribute in &self.attributes {
            let before = model.text_attribute_before(position, attribute);
            let after = model.text_attribute_after(position, attribute);
            if before == after {
                continue;
            }
            let ahead = match direction {
                CaretDirection::Backward => before,
                CaretDirection::Forward => after,
            };
            if model.selection().attribute(attribute) != ahead {
                updates.push((attribute.clone(), ahead.map(str::to_string)));
            }
        }
        if updates.is_empty() {
            return false;
        }

        let entering = updates.iter().any(|(_, value)| value.is_some());
        for (attribute, value) in updates {
            match value {
                Some(value) => model.set_selection_attribute(&attribute, &value),
                None => model.remove_selection_attribute(&attribute),
            }
        }
        self.state = if entering {
            CaretState::EnteringBoundary
        } else {
            CaretState::ExitingBoundary
        };
        log::trace!("Caret stepped {direction:?} at {position}, now {:?}", self.state);
        true
    }

    fn resting_state(&self, model: &ModelDocument) -> CaretState {
        let selection = model.selection();
        if self.attributes.iter().any(|attribute| selection.has_attribute(attribute)) {
            CaretState::Inside
        } else {
            CaretState::Outside
        }
    }
}
