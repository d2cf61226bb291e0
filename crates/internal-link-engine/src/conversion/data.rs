//! The data pipeline: the persisted markup form of a model and back.

use crate::conversion::{DowncastRules, UpcastRules};
use crate::model::{ModelElement, ModelNode, Schema};
use crate::view::{ViewTree, markup};

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to parse markup: {0}")]
    Markup(#[from] roxmltree::Error),
}

/// Build a fresh data view of `root`. Nothing editing-only is rendered.
pub fn to_view(root: &ModelElement, rules: &DowncastRules) -> ViewTree {
    let mut tree = ViewTree::new();
    let parent = tree.root();
    tree.change(|writer| {
        let mut index = 0;
        for block in root.children.iter().filter_map(ModelNode::as_element) {
            if rules.render_block(block, &[], writer, parent, index).is_some() {
                index += 1;
            }
        }
    });
    tree
}

pub fn stringify(root: &ModelElement, rules: &DowncastRules) -> String {
    markup::stringify(&to_view(root, rules))
}

pub fn parse(
    data: &str,
    rules: &UpcastRules,
    schema: &Schema,
) -> Result<Vec<ModelNode>, DataError> {
    let tree = markup::parse(data)?;
    Ok(rules.upcast(&tree, schema))
}
