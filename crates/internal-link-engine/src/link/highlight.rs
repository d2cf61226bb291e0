use std::collections::BTreeSet;

use crate::conversion::Mapper;
use crate::link::{CLASS_HIGHLIGHT, MODEL_INTERNAL_LINK_ID_ATTRIBUTE, find_link_range, is_link_element};
use crate::model::ModelDocument;
use crate::view::{ViewNodeId, ViewWriter};

/// Where a [`LinkHighlighter`] is within one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightPhase {
    #[default]
    Idle,
    Removing,
    /// Old highlight gone, waiting for the view to be converted
    Recomputing,
    Applying,
}

/// Keeps [`CLASS_HIGHLIGHT`] on exactly the link wrappers of the link that
/// holds the selection.
///
/// Each render cycle calls [`remove_highlight`](Self::remove_highlight)
/// before the view is converted and [`apply_highlight`](Self::apply_highlight)
/// after, both inside the same view transaction.
#[derive(Debug, Clone, Default)]
pub struct LinkHighlighter {
    enabled: bool,
    highlighted: BTreeSet<ViewNodeId>,
    phase: HighlightPhase,
}

impl LinkHighlighter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn phase(&self) -> HighlightPhase {
        self.phase
    }

    pub fn highlighted(&self) -> &BTreeSet<ViewNodeId> {
        &self.highlighted
    }

    pub fn remove_highlight(&mut self, writer: &mut ViewWriter<'_>) {
        self.phase = HighlightPhase::Removing;
        for id in std::mem::take(&mut self.highlighted) {
            writer.remove_class(id, CLASS_HIGHLIGHT);
        }
        self.phase = HighlightPhase::Recomputing;
    }

    pub fn apply_highlight(&mut self, model: &ModelDocument, mapper: &Mapper, writer: &mut ViewWriter<'_>) {
        self.phase = HighlightPhase::Applying;

        let selection = model.selection();
        if self.enabled
            && let Some(value) = selection.attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE)
        {
            let range = find_link_range(model, selection.first_position(), value);
            if let Some(view_range) = mapper.to_view_range(&range) {
                let wrappers: Vec<ViewNodeId> = writer
                    .tree()
                    .items_in_range(&view_range)
                    .into_iter()
                    .filter(|&id| writer.tree().element(id).is_some_and(is_link_element))
                    .collect();
                for id in wrappers {
                    writer.add_class(id, CLASS_HIGHLIGHT);
                    self.highlighted.insert(id);
                }
            }
        }

        log::trace!("Highlighted {} link wrapper(s)", self.highlighted.len());
        self.phase = HighlightPhase::Idle;
    }
}
