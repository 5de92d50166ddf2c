//! DublinCore metadata elements, usable on feeds and entries in both formats.

use super::{Extension, ExtensionFactory, Fragment, Namespace};

pub const NAME: &str = "dc";

const NAMESPACES: &[Namespace] = &[Namespace {
    prefix: "dc",
    uri: "http://purl.org/dc/elements/1.1/",
}];

pub fn factory() -> ExtensionFactory {
    ExtensionFactory::new(new_instance, new_instance)
}

fn new_instance() -> Box<dyn Extension> {
    Box::new(DublinCore::default())
}

/// The fifteen DCMES elements. Each may repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DublinCore {
    pub contributor: Vec<String>,
    pub coverage: Vec<String>,
    pub creator: Vec<String>,
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub format: Vec<String>,
    pub identifier: Vec<String>,
    pub language: Vec<String>,
    pub publisher: Vec<String>,
    pub relation: Vec<String>,
    pub rights: Vec<String>,
    pub source: Vec<String>,
    pub subject: Vec<String>,
    pub title: Vec<String>,
    pub kind: Vec<String>,
}

impl DublinCore {
    fn elements(&self) -> [(&'static str, &[String]); 15] {
        [
            ("dc:contributor", &self.contributor),
            ("dc:coverage", &self.coverage),
            ("dc:creator", &self.creator),
            ("dc:date", &self.date),
            ("dc:description", &self.description),
            ("dc:format", &self.format),
            ("dc:identifier", &self.identifier),
            ("dc:language", &self.language),
            ("dc:publisher", &self.publisher),
            ("dc:relation", &self.relation),
            ("dc:rights", &self.rights),
            ("dc:source", &self.source),
            ("dc:subject", &self.subject),
            ("dc:title", &self.title),
            ("dc:type", &self.kind),
        ]
    }

    fn fragment(&self) -> Option<Fragment> {
        let mut fragment = Fragment::new();
        for (name, values) in self.elements() {
            for value in values {
                fragment.push_text_opt(name, Some(value.as_str()));
            }
        }
        fragment.non_empty()
    }
}

impl Extension for DublinCore {
    fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    fn rss_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }

    fn atom_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }
}
