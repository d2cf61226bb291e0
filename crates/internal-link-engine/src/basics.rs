//! Paragraphs, soft breaks and the bold/italic formatting that internal links
//! are edited alongside.

use crate::conversion::{Conversion, ElementToAttribute, Pipeline, ViewMatcher};
use crate::model::Schema;
use crate::view::{DEFAULT_PRIORITY, ElementKind, ViewElement, WrapperKind};

pub const PARAGRAPH: &str = "paragraph";
pub const SOFT_BREAK: &str = "softBreak";
pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";

/// Register the basic elements and formatting in `schema` and every
/// conversion pipeline.
pub fn init(schema: &mut Schema, conversion: &mut Conversion) {
    schema.register_block(PARAGRAPH);
    schema.register_inline(SOFT_BREAK);
    schema.extend_text(BOLD);
    schema.extend_text(ITALIC);

    for pipeline in [Pipeline::Data, Pipeline::Editing] {
        conversion
            .for_downcast(pipeline)
            .element_to_element(PARAGRAPH, "p", ElementKind::Container)
            .element_to_element(SOFT_BREAK, "br", ElementKind::Empty)
            .attribute_to_element(BOLD, |_| formatting("strong"))
            .attribute_to_element(ITALIC, |_| formatting("em"));
    }

    let mut upcast = conversion.for_upcast();
    upcast
        .element_to_element("p", PARAGRAPH)
        .element_to_element("br", SOFT_BREAK)
        .auto_paragraph(PARAGRAPH);
    for (view, key) in [("strong", BOLD), ("b", BOLD), ("em", ITALIC), ("i", ITALIC)] {
        upcast.element_to_attribute(ElementToAttribute::new(ViewMatcher::new(view), key, |_| {
            Some("true".to_string())
        }));
    }
}

fn formatting(name: &str) -> ViewElement {
    ViewElement::attribute(name, WrapperKind::Formatting, DEFAULT_PRIORITY)
}
