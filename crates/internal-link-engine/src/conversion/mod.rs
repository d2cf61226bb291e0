//! # Conversion
//!
//! Rules mapping the model to views (downcast) and views back to the model
//! (upcast). Rules are registered per pipeline through
//! [`Conversion::for_downcast`] and [`Conversion::for_upcast`]:
//!
//! - **Data downcast** builds the persisted form returned by `get_data()`
//! - **Editing downcast** keeps the live editing view in sync
//! - **Upcast** imports markup given to `set_data()`
//!
//! Both downcast pipelines share one algorithm ([`downcast`]), so equal rules
//! produce equal wrapper nesting.

pub mod data;
pub mod downcast;
pub mod editing;
pub mod mapper;
pub mod upcast;

pub use data::DataError;
pub use downcast::{AttributeToElement, DowncastRules, ElementToElement};
pub use editing::EditingController;
pub use mapper::Mapper;
pub use upcast::{ElementToAttribute, UpcastRules, ViewMatcher};

use crate::view::{ElementKind, ViewElement};

/// The two downcast pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Data,
    Editing,
}

/// Registry of every conversion rule, one set per pipeline.
#[derive(Default)]
pub struct Conversion {
    data: DowncastRules,
    editing: DowncastRules,
    upcast: UpcastRules,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_downcast(&mut self, pipeline: Pipeline) -> DowncastHelpers<'_> {
        let rules = match pipeline {
            Pipeline::Data => &mut self.data,
            Pipeline::Editing => &mut self.editing,
        };
        DowncastHelpers { rules }
    }

    pub fn for_upcast(&mut self) -> UpcastHelpers<'_> {
        UpcastHelpers {
            rules: &mut self.upcast,
        }
    }

    pub fn downcast_rules(&self, pipeline: Pipeline) -> &DowncastRules {
        match pipeline {
            Pipeline::Data => &self.data,
            Pipeline::Editing => &self.editing,
        }
    }

    pub fn upcast_rules(&self) -> &UpcastRules {
        &self.upcast
    }
}

/// Registration helpers for one downcast pipeline.
pub struct DowncastHelpers<'a> {
    rules: &'a mut DowncastRules,
}

impl DowncastHelpers<'_> {
    /// Render a text attribute as a wrapper built from the attribute value.
    pub fn attribute_to_element(
        &mut self,
        model_key: &str,
        view: impl Fn(&str) -> ViewElement + 'static,
    ) -> &mut Self {
        self.rules.attributes.push(AttributeToElement {
            model_key: model_key.to_string(),
            view: Box::new(view),
        });
        self
    }

    /// Render a model element as a view element of the given kind.
    pub fn element_to_element(&mut self, model: &str, view: &str, kind: ElementKind) -> &mut Self {
        self.rules.elements.insert(
            model.to_string(),
            ElementToElement {
                view: view.to_string(),
                kind,
            },
        );
        self
    }
}

/// Registration helpers for the upcast pipeline.
pub struct UpcastHelpers<'a> {
    rules: &'a mut UpcastRules,
}

impl UpcastHelpers<'_> {
    pub fn element_to_element(&mut self, view: &str, model: &str) -> &mut Self {
        self.rules
            .elements
            .insert(view.to_string(), model.to_string());
        self
    }

    pub fn element_to_attribute(&mut self, rule: ElementToAttribute) -> &mut Self {
        self.rules.attributes.push(rule);
        self
    }

    /// Wrap inline content found directly under the root in `model` blocks.
    pub fn auto_paragraph(&mut self, model: &str) -> &mut Self {
        self.rules.set_auto_paragraph(model);
        self
    }
}
