use crate::editor::Editor;
use crate::link::{MODEL_INTERNAL_LINK_ID_ATTRIBUTE, find_link_range};
use crate::model::{ModelError, ModelSelection};

/// Link the selection to a target id.
pub struct LinkCommand;

impl LinkCommand {
    /// Link id the selection carries.
    pub fn value(editor: &Editor) -> Option<&str> {
        editor
            .model()
            .selection()
            .attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE)
    }

    /// - range selected: link the range
    /// - caret inside a link: point the whole link at `id`
    /// - caret elsewhere: insert `id` as linked text and place the caret
    ///   after it, outside the new link
    pub fn execute(editor: &mut Editor, id: &str) -> Result<(), ModelError> {
        let selection = editor.model.selection().clone();
        if !selection.is_collapsed() {
            return editor.set_attribute(&selection.range(), MODEL_INTERNAL_LINK_ID_ATTRIBUTE, id);
        }

        let caret = selection.focus();
        if let Some(current) = selection.attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE) {
            let range = find_link_range(&editor.model, caret, current);
            return editor.set_attribute(&range, MODEL_INTERNAL_LINK_ID_ATTRIBUTE, id);
        }

        let mut attributes = selection.attributes().clone();
        attributes.insert(MODEL_INTERNAL_LINK_ID_ATTRIBUTE.to_string(), id.to_string());
        let inserted = editor
            .model
            .insert_text(caret, id, attributes, &editor.schema)?;
        editor
            .model
            .set_selection(ModelSelection::collapsed(inserted.end))?;
        editor
            .model
            .remove_selection_attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE);
        editor.after_edit();
        Ok(())
    }
}

/// Remove the link from the selection, or from the whole link around a
/// caret.
pub struct UnlinkCommand;

impl UnlinkCommand {
    pub fn is_enabled(editor: &Editor) -> bool {
        let selection = editor.model().selection();
        !selection.is_collapsed() || selection.has_attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE)
    }

    pub fn execute(editor: &mut Editor) -> Result<(), ModelError> {
        let selection = editor.model().selection();
        let range = match selection.attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE) {
            Some(current) if selection.is_collapsed() => {
                find_link_range(editor.model(), selection.focus(), current)
            }
            _ => selection.range(),
        };
        editor.remove_attribute(&range, MODEL_INTERNAL_LINK_ID_ATTRIBUTE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use pretty_assertions::assert_eq;

    const DATA: &str = r#"<p>ab<internallink internallinkid="1">cd</internallink>ef</p>"#;

    fn editor(anchor: usize, focus: usize) -> Editor {
        let mut editor = Editor::default();
        editor.set_data(DATA).unwrap();
        editor
            .set_selection(ModelSelection::new(
                Position::in_block(0, anchor),
                Position::in_block(0, focus),
            ))
            .unwrap();
        editor
    }

    #[test]
    fn test_link_range() {
        let mut editor = editor(0, 1);
        LinkCommand::execute(&mut editor, "9").unwrap();

        assert_eq!(
            editor.get_data(),
            r#"<p><internallink internallinkid="9">a</internallink>b<internallink internallinkid="1">cd</internallink>ef</p>"#
        );
    }

    #[test]
    fn test_link_inside_link_retargets_whole_run() {
        let mut editor = editor(3, 3);
        assert_eq!(LinkCommand::value(&editor), Some("1"));

        LinkCommand::execute(&mut editor, "2").unwrap();

        assert_eq!(
            editor.get_data(),
            r#"<p>ab<internallink internallinkid="2">cd</internallink>ef</p>"#
        );
        assert_eq!(LinkCommand::value(&editor), Some("2"));
    }

    #[test]
    fn test_link_at_plain_caret_inserts_id() {
        let mut editor = editor(6, 6);
        LinkCommand::execute(&mut editor, "x").unwrap();

        assert_eq!(
            editor.get_data(),
            r#"<p>ab<internallink internallinkid="1">cd</internallink>ef<internallink internallinkid="x">x</internallink></p>"#
        );
        assert_eq!(editor.model().selection().focus().offset, 7);
        assert_eq!(LinkCommand::value(&editor), None);
    }

    #[test]
    fn test_unlink_at_caret_removes_whole_run() {
        let mut editor = editor(3, 3);
        assert!(UnlinkCommand::is_enabled(&editor));

        UnlinkCommand::execute(&mut editor).unwrap();

        assert_eq!(editor.get_data(), "<p>abcdef</p>");
        assert!(!UnlinkCommand::is_enabled(&editor));
    }

    #[test]
    fn test_unlink_part_of_range() {
        let mut editor = editor(3, 6);
        UnlinkCommand::execute(&mut editor).unwrap();

        assert_eq!(
            editor.get_data(),
            r#"<p>ab<internallink internallinkid="1">c</internallink>def</p>"#
        );
    }
}
