use crate::link::MODEL_INTERNAL_LINK_ID_ATTRIBUTE;
use crate::model::{ModelDocument, ModelElement, ModelRange, Position};

/// The maximal run of text around `position` whose link id equals `value`.
///
/// The walk starts at the text node containing `position`, or the node next
/// to it in the walking direction, and continues over siblings while they are
/// text carrying `value`. When nothing matches on a side, that end of the
/// range stays at `position`, so a position outside any such run yields a
/// collapsed range.
pub fn find_link_range(document: &ModelDocument, position: &Position, value: &str) -> ModelRange {
    let Ok(element) = document.element_at(&position.path) else {
        return ModelRange::collapsed(position.clone());
    };
    ModelRange::new(
        find_bound(element, position, value, true),
        find_bound(element, position, value, false),
    )
}

fn find_bound(element: &ModelElement, position: &Position, value: &str, look_back: bool) -> Position {
    let first = element.text_span_containing(position.offset).or_else(|| {
        if look_back {
            element.span_before(position.offset)
        } else {
            element.span_after(position.offset)
        }
    });
    let Some(first) = first else {
        return position.clone();
    };

    let spans: Vec<_> = element.child_spans().collect();
    let carries_value = |index: usize| {
        element.children[index].text_attribute(MODEL_INTERNAL_LINK_ID_ATTRIBUTE) == Some(value)
    };

    let mut last = None;
    let mut index = Some(first.index);
    while let Some(current) = index.filter(|&current| current < spans.len() && carries_value(current)) {
        last = Some(current);
        index = if look_back {
            current.checked_sub(1)
        } else {
            Some(current + 1)
        };
    }

    match last {
        Some(last) if look_back => position.with_offset(spans[last].start),
        Some(last) => position.with_offset(spans[last].end),
        None => position.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelElement, ModelNode, ModelText};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const KEY: &str = MODEL_INTERNAL_LINK_ID_ATTRIBUTE;

    fn document(children: Vec<ModelNode>) -> ModelDocument {
        let mut document = ModelDocument::new();
        document.replace_content(vec![ModelElement::new("paragraph").with_children(children).into()]);
        document
    }

    fn link(text: &str, id: &str) -> ModelNode {
        ModelText::new(text).with_attribute(KEY, id).into()
    }

    fn plain(text: &str) -> ModelNode {
        ModelText::new(text).into()
    }

    #[test]
    fn test_every_position_of_a_run_finds_the_whole_run() {
        for n in 1..=12 {
            let run = "x".repeat(n);
            let document = document(vec![plain("ab"), link(&run, "7"), plain("cd")]);

            for offset in 2..=2 + n {
                let range = find_link_range(&document, &Position::in_block(0, offset), "7");
                assert_eq!(range, ModelRange::in_block(0, 2, 2 + n), "n = {n}, offset = {offset}");
            }
        }
    }

    #[test]
    fn test_run_touching_block_edges() {
        let document = document(vec![link("abc", "7")]);

        for offset in 0..=3 {
            let range = find_link_range(&document, &Position::in_block(0, offset), "7");
            assert_eq!(range, ModelRange::in_block(0, 0, 3));
        }
    }

    #[rstest]
    #[case::different_value_after(vec![link("ab", "1"), link("cd", "2")], 2, "1", (0, 2))]
    #[case::different_value_before(vec![link("ab", "1"), link("cd", "2")], 2, "2", (2, 4))]
    #[case::other_formatting_inside_run(
        vec![
            link("ab", "1"),
            ModelText::new("cd").with_attribute(KEY, "1").with_attribute("bold", "true").into(),
            plain("e"),
        ],
        1,
        "1",
        (0, 4)
    )]
    #[case::inline_element_stops_walk(
        vec![link("ab", "1"), ModelElement::new("softBreak").into(), link("cd", "1")],
        1,
        "1",
        (0, 2)
    )]
    #[case::outside_any_run(vec![plain("ab"), link("cd", "1")], 1, "1", (1, 1))]
    #[case::value_mismatch(vec![link("abcd", "1")], 2, "2", (2, 2))]
    fn test_bounds(
        #[case] children: Vec<ModelNode>,
        #[case] offset: usize,
        #[case] value: &str,
        #[case] expected: (usize, usize),
    ) {
        let document = document(children);
        let range = find_link_range(&document, &Position::in_block(0, offset), value);

        assert_eq!(range, ModelRange::in_block(0, expected.0, expected.1));
    }

    #[test]
    fn test_invalid_path_is_collapsed() {
        let document = document(vec![link("ab", "1")]);
        let position = Position::in_block(5, 1);

        assert!(find_link_range(&document, &position, "1").is_collapsed());
    }
}
