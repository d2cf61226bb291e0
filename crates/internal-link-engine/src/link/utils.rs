use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::link::{LINK_PRIORITY, VIEW_INTERNAL_LINK_ID_ATTRIBUTE, VIEW_INTERNAL_LINK_TAG};
use crate::view::{ElementKind, ViewElement, WrapperKind};

/// Characters left as they are when a link id goes into a url: the unreserved
/// marks plus everything with a meaning inside a url, as `encodeURI` does.
const URL_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

/// Wrapper rendered around text carrying link `id`, in both downcast
/// pipelines.
pub fn create_link_element(id: &str) -> ViewElement {
    ViewElement::attribute(VIEW_INTERNAL_LINK_TAG, WrapperKind::InternalLink, LINK_PRIORITY)
        .with_attribute(VIEW_INTERNAL_LINK_ID_ATTRIBUTE, id)
}

pub fn is_link_element(element: &ViewElement) -> bool {
    element.kind == ElementKind::Attribute(WrapperKind::InternalLink)
}

/// Replace the first occurrence of `placeholder` in `url` with the
/// percent-encoded `value`. Url delimiters in `value` are kept, so an id can
/// carry a path or query. A url without the placeholder is returned as is.
pub fn replace_placeholder_in_url(url: &str, placeholder: &str, value: &str) -> String {
    let encoded = utf8_percent_encode(value, URL_VALUE_SET).to_string();
    url.replacen(placeholder, &encoded, 1)
}

/// Fresh id for a new link target.
pub fn new_link_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_create_link_element() {
        let element = create_link_element("42");

        assert_eq!(element.name, "internallink");
        assert_eq!(element.attribute_value("internallinkid"), Some("42"));
        assert_eq!(element.priority, 5);
        assert!(is_link_element(&element));
    }

    #[test]
    fn test_lookalike_is_not_a_link_element() {
        let lookalike = ViewElement::container("internallink").with_attribute("internallinkid", "42");
        assert!(!is_link_element(&lookalike));

        let formatting = ViewElement::attribute("internallink", WrapperKind::Formatting, 5);
        assert!(!is_link_element(&formatting));
    }

    #[rstest]
    #[case("/docs/{id}", "{id}", "42", "/docs/42")]
    #[case("/docs/{id}?back={id}", "{id}", "42", "/docs/42?back={id}")]
    #[case("/docs/{id}", "{id}", "a b/c", "/docs/a%20b/c")]
    #[case("/docs/{id}", "{id}", "a b/c?x=1#y", "/docs/a%20b/c?x=1#y")]
    #[case("/docs/{id}", "{id}", "q&a=b+c", "/docs/q&a=b+c")]
    #[case("/docs/{id}", "{id}", "it's (1)!*~", "/docs/it's%20(1)!*~")]
    #[case("/docs/{id}", "{id}", "100%", "/docs/100%25")]
    #[case("/docs/{id}", "{id}", "a\"<b>", "/docs/a%22%3Cb%3E")]
    #[case("/docs/{id}", "{id}", "café", "/docs/caf%C3%A9")]
    #[case("/docs/", "{id}", "42", "/docs/")]
    #[case("/docs/{id}", "{id}", "", "/docs/")]
    fn test_replace_placeholder_in_url(
        #[case] url: &str,
        #[case] placeholder: &str,
        #[case] value: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(replace_placeholder_in_url(url, placeholder, value), expected);
    }

    #[test]
    fn test_new_link_ids_are_unique() {
        let first = new_link_id();
        assert_ne!(first, new_link_id());
        assert_eq!(first.len(), 36);
    }
}
