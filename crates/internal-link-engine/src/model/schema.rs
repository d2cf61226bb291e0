use std::collections::BTreeSet;

/// Which elements may appear where, and which attributes text may carry.
///
/// The document is two levels deep: the root holds blocks, blocks hold text
/// and inline elements.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    blocks: BTreeSet<String>,
    inline_elements: BTreeSet<String>,
    text_attributes: BTreeSet<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_block(&mut self, name: impl Into<String>) {
        self.blocks.insert(name.into());
    }

    pub fn register_inline(&mut self, name: impl Into<String>) {
        self.inline_elements.insert(name.into());
    }

    /// Allow `attribute` on `$text`.
    pub fn extend_text(&mut self, attribute: impl Into<String>) {
        self.text_attributes.insert(attribute.into());
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.blocks.contains(name)
    }

    pub fn is_inline(&self, name: &str) -> bool {
        self.inline_elements.contains(name)
    }

    pub fn allows_text_attribute(&self, attribute: &str) -> bool {
        self.text_attributes.contains(attribute)
    }

    pub fn text_attributes(&self) -> impl Iterator<Item = &str> {
        self.text_attributes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_text() {
        let mut schema = Schema::new();
        assert!(!schema.allows_text_attribute("internalLinkId"));

        schema.extend_text("internalLinkId");

        assert!(schema.allows_text_attribute("internalLinkId"));
        assert_eq!(schema.text_attributes().collect::<Vec<_>>(), ["internalLinkId"]);
    }

    #[test]
    fn test_blocks_and_inlines_are_separate() {
        let mut schema = Schema::new();
        schema.register_block("paragraph");
        schema.register_inline("softBreak");

        assert!(schema.is_block("paragraph"));
        assert!(!schema.is_inline("paragraph"));
        assert!(schema.is_inline("softBreak"));
    }
}
