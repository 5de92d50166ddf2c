//! `xml:base` support. Contributes an attribute instead of child elements.

use super::{Extension, ExtensionFactory, Fragment};

pub const NAME: &str = "base";

pub fn factory() -> ExtensionFactory {
    ExtensionFactory::new(new_instance, new_instance)
}

fn new_instance() -> Box<dyn Extension> {
    Box::new(XmlBase::default())
}

/// Base URI against which relative references inside the element resolve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlBase {
    pub base: Option<String>,
}

impl XmlBase {
    fn fragment(&self) -> Option<Fragment> {
        self.base
            .as_deref()
            .map(|base| Fragment::new().attr("xml:base", base))
    }
}

// The xml prefix is bound by definition, so no namespace is declared.
impl Extension for XmlBase {
    fn rss_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }

    fn atom_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }
}
