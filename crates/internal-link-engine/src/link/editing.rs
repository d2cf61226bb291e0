use crate::conversion::{Conversion, ElementToAttribute, Pipeline, ViewMatcher};
use crate::editor::EditorConfig;
use crate::link::{
    LinkHighlighter, MODEL_INTERNAL_LINK_ID_ATTRIBUTE, VIEW_INTERNAL_LINK_ID_ATTRIBUTE,
    VIEW_INTERNAL_LINK_TAG, create_link_element, replace_placeholder_in_url,
};
use crate::model::Schema;
use crate::typing::TwoStepCaretMovement;

/// Wires internal links into an editor.
#[derive(Debug, Clone)]
pub struct InternalLinkEditing {
    highlight_selected_link: bool,
    url_template: Option<String>,
    url_placeholder: String,
}

impl InternalLinkEditing {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            highlight_selected_link: config.highlight_selected_link,
            url_template: config.url_template.clone(),
            url_placeholder: config.url_placeholder.clone(),
        }
    }

    /// Allow the link attribute on text, register its three conversion rules
    /// and make the caret step over link boundaries.
    pub fn init(
        &self,
        schema: &mut Schema,
        conversion: &mut Conversion,
        two_step: &mut TwoStepCaretMovement,
    ) {
        schema.extend_text(MODEL_INTERNAL_LINK_ID_ATTRIBUTE);

        conversion
            .for_downcast(Pipeline::Data)
            .attribute_to_element(MODEL_INTERNAL_LINK_ID_ATTRIBUTE, create_link_element);
        conversion
            .for_downcast(Pipeline::Editing)
            .attribute_to_element(MODEL_INTERNAL_LINK_ID_ATTRIBUTE, create_link_element);

        // Without the id attribute the element is not a link and its text is
        // imported as is.
        conversion.for_upcast().element_to_attribute(ElementToAttribute::new(
            ViewMatcher::new(VIEW_INTERNAL_LINK_TAG).with_attribute(VIEW_INTERNAL_LINK_ID_ATTRIBUTE),
            MODEL_INTERNAL_LINK_ID_ATTRIBUTE,
            |element| {
                element
                    .attribute_value(VIEW_INTERNAL_LINK_ID_ATTRIBUTE)
                    .map(str::to_string)
            },
        ));

        two_step.register_attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE);
    }

    /// Highlighter for one editing view.
    pub fn highlighter(&self) -> LinkHighlighter {
        LinkHighlighter::new(self.highlight_selected_link)
    }

    /// URL of link `id` built from the configured template.
    pub fn url_for(&self, id: &str) -> Option<String> {
        self.url_template
            .as_deref()
            .map(|template| replace_placeholder_in_url(template, &self.url_placeholder, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_uses_template() {
        let config = EditorConfig {
            url_template: Some("https://wiki.example/page/{id}".to_string()),
            ..EditorConfig::default()
        };
        let link = InternalLinkEditing::new(&config);

        assert_eq!(
            link.url_for("Home Page").as_deref(),
            Some("https://wiki.example/page/Home%20Page")
        );
    }

    #[test]
    fn test_url_for_without_template() {
        let link = InternalLinkEditing::new(&EditorConfig::default());
        assert_eq!(link.url_for("1"), None);
    }

    #[test]
    fn test_init_registers_attribute() {
        let mut schema = Schema::new();
        let mut conversion = Conversion::new();
        let mut two_step = TwoStepCaretMovement::new();

        InternalLinkEditing::new(&EditorConfig::default()).init(&mut schema, &mut conversion, &mut two_step);

        assert!(schema.allows_text_attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE));
        assert_eq!(two_step.attributes().collect::<Vec<_>>(), [MODEL_INTERNAL_LINK_ID_ATTRIBUTE]);
    }
}
