//! Minimal owned XML element tree and its writer.
//!
//! Serializers build a tree first and write it in one pass, so a validation
//! failure never leaves partial output behind.

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{FeedError, FeedResult};

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(XmlElement),
    /// Character data, escaped on write.
    Text(String),
    /// Character data written verbatim inside `<![CDATA[...]]>`.
    CData(String),
    /// Pre-serialised markup written as is. Callers check well-formedness.
    Raw(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element holding a single escaped text node.
    pub fn text_element(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Adds the attribute only when `value` is set.
    pub fn attr_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn cdata(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::CData(text.into()));
        self
    }

    pub fn raw(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Node::Raw(markup.into()));
        self
    }

    pub fn child(mut self, element: XmlElement) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    pub fn push(&mut self, element: XmlElement) {
        self.children.push(Node::Element(element));
    }

    /// Appends a text-only child when `value` is set.
    pub fn push_text_opt(&mut self, name: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.push(XmlElement::text_element(name, value));
        }
    }

    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Direct element children, in order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }
}

/// Serialises `root` as a complete document with an XML declaration.
///
/// `encoding_label` only goes into the declaration; transcoding happens
/// afterwards. `pretty` indents by two spaces without touching text nodes.
pub fn write_document(root: &XmlElement, encoding_label: &str, pretty: bool) -> FeedResult<Vec<u8>> {
    let mut writer = if pretty {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    } else {
        Writer::new(Vec::new())
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some(encoding_label), None)))
        .map_err(|e| FeedError::Xml(format!("failed to write XML declaration: {e}")))?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    if pretty {
        bytes.push(b'\n');
    }
    Ok(bytes)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> FeedResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| xml_error(&element.name, e));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| xml_error(&element.name, e))?;

    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| xml_error(&element.name, e))?,
            Node::CData(text) => {
                for section in cdata_sections(text) {
                    writer
                        .write_event(Event::CData(BytesCData::new(section)))
                        .map_err(|e| xml_error(&element.name, e))?;
                }
            }
            Node::Raw(markup) => writer
                .write_event(Event::Text(BytesText::from_escaped(markup.as_str())))
                .map_err(|e| xml_error(&element.name, e))?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| xml_error(&element.name, e))
}

/// Splits text so no section contains the `]]>` terminator.
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        // "a]]>b" becomes "a]]" + ">b"
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

fn xml_error(element: &str, e: impl std::fmt::Display) -> FeedError {
    FeedError::Xml(format!("failed to write <{element}>: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(root: &XmlElement, pretty: bool) -> String {
        String::from_utf8(write_document(root, "UTF-8", pretty).unwrap()).unwrap()
    }

    #[test]
    fn test_compact_document() {
        let root = XmlElement::new("root")
            .attr("version", "1")
            .child(XmlElement::text_element("a", "x & y"))
            .child(XmlElement::new("empty").attr("k", "<v>"));
        assert_eq!(
            render(&root, false),
            r#"<?xml version="1.0" encoding="UTF-8"?><root version="1"><a>x &amp; y</a><empty k="&lt;v&gt;"/></root>"#
        );
    }

    #[test]
    fn test_pretty_document() {
        let root = XmlElement::new("root")
            .child(XmlElement::new("parent").child(XmlElement::text_element("a", "text")));
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>\n  <parent>\n    <a>text</a>\n  </parent>\n</root>\n";
        assert_eq!(render(&root, true), expected);
    }

    #[test]
    fn test_cdata_is_verbatim() {
        let root = XmlElement::new("c").cdata("<b>bold</b> & more");
        assert!(render(&root, false).contains("<c><![CDATA[<b>bold</b> & more]]></c>"));
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let root = XmlElement::new("c").cdata("a]]>b");
        assert!(render(&root, false).contains("<c><![CDATA[a]]]]><![CDATA[>b]]></c>"));
    }

    #[test]
    fn test_raw_markup_is_not_escaped() {
        let root = XmlElement::new("div").raw("<p>hi</p>");
        assert!(render(&root, false).ends_with("<div><p>hi</p></div>"));
    }
}
