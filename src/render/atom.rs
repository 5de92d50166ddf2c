//! Atom 1.0 (RFC 4287) serializer.

use super::{
    declare_namespace, extension_namespaces, in_entry, log_omissions, ordered_entries,
    resolve_updated, Format, Omission, RenderOptions,
};
use crate::error::{FeedResult, ValidationError};
use crate::model::validate::{require, require_some};
use crate::model::{Category, Content, Entry, Feed, Link, Person, Rel, Text, TextType};
use crate::xml::XmlElement;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

const FEED_OMISSIONS: &[Omission<Feed>] = &[
    Omission {
        field: "pub_date",
        present: |f| f.pub_date().is_some(),
    },
    Omission {
        field: "docs",
        present: |f| f.docs().is_some(),
    },
    Omission {
        field: "webmaster",
        present: |f| f.webmaster().is_some(),
    },
    Omission {
        field: "managing_editor",
        present: |f| f.managing_editor().is_some(),
    },
    Omission {
        field: "ttl",
        present: |f| f.ttl().is_some(),
    },
    Omission {
        field: "skip_hours",
        present: |f| !f.skip_hours().is_empty(),
    },
    Omission {
        field: "skip_days",
        present: |f| !f.skip_days().is_empty(),
    },
    Omission {
        field: "image",
        present: |f| f.image().is_some(),
    },
    Omission {
        field: "cloud",
        present: |f| f.cloud().is_some(),
    },
    Omission {
        field: "text_input",
        present: |f| f.text_input().is_some(),
    },
    Omission {
        field: "rating",
        present: |f| f.rating().is_some(),
    },
];

const ENTRY_OMISSIONS: &[Omission<Entry>] = &[
    Omission {
        field: "comments",
        present: |e| e.comments().is_some(),
    },
    Omission {
        field: "ttl",
        present: |e| e.ttl().is_some(),
    },
    Omission {
        field: "guid",
        present: |e| e.guid().is_some_and(|g| g.guid != e.id()),
    },
];

/// Builds the `<feed>` document tree.
pub(crate) fn build(feed: &Feed, options: &RenderOptions) -> FeedResult<XmlElement> {
    require("feed.id", feed.id())?;
    require("feed.title", feed.title())?;
    let updated = resolve_updated(feed, options.updated_policy)?;
    feed.extensions()
        .validate()
        .map_err(|e| e.within("feed"))?;

    let mut authors = Vec::with_capacity(feed.authors().len());
    for (i, author) in feed.authors().iter().enumerate() {
        authors.push(person("author", author).map_err(|e| e.within(&format!("feed.author[{i}]")))?);
    }
    let mut contributors = Vec::with_capacity(feed.contributors().len());
    for (i, contributor) in feed.contributors().iter().enumerate() {
        contributors.push(
            person("contributor", contributor)
                .map_err(|e| e.within(&format!("feed.contributor[{i}]")))?,
        );
    }

    let mut entries = Vec::with_capacity(feed.entries().len());
    for (index, entry) in ordered_entries(feed, options.entry_order) {
        entries.push(build_entry(entry).map_err(in_entry(index))?);
        log_omissions(Format::Atom, "entry", ENTRY_OMISSIONS, entry);
    }
    log_omissions(Format::Atom, "feed", FEED_OMISSIONS, feed);

    let mut root = XmlElement::new("feed").attr("xmlns", ATOM_NS);
    for ns in extension_namespaces(feed) {
        declare_namespace(&mut root, ns);
    }
    if let Some(language) = feed.language() {
        root.push_attr("xml:lang", language);
    }

    root.push(XmlElement::text_element("id", feed.id()));
    root.push(XmlElement::text_element("title", feed.title()));
    root.push(XmlElement::text_element("updated", updated.to_rfc3339()));
    for author in authors {
        root.push(author);
    }
    for link in feed.links() {
        root.push(link_element(link));
    }
    for category in feed.categories() {
        root.push(category_element(category));
    }
    for contributor in contributors {
        root.push(contributor);
    }
    if let Some(generator) = feed.generator() {
        root.push(
            XmlElement::text_element("generator", generator.name.as_str())
                .attr_opt("uri", generator.uri.as_deref())
                .attr_opt("version", generator.version.as_deref()),
        );
    }
    root.push_text_opt("icon", feed.icon());
    root.push_text_opt("logo", feed.logo());
    root.push_text_opt("rights", feed.rights());
    root.push_text_opt("subtitle", feed.subtitle());

    for fragment in feed.extensions().atom_fragments() {
        fragment.merge_into(&mut root);
    }
    for entry in entries {
        root.push(entry);
    }
    Ok(root)
}

fn build_entry(entry: &Entry) -> Result<XmlElement, ValidationError> {
    require("id", entry.id())?;
    let title = require_some("title", entry.title())?;
    let updated = entry
        .updated()
        .or(entry.published())
        .ok_or_else(|| ValidationError::missing("updated"))?;
    entry.extensions().validate()?;

    let mut el = XmlElement::new("entry");
    el.push(XmlElement::text_element("id", entry.id()));
    el.push(XmlElement::text_element("title", title));
    el.push(XmlElement::text_element("updated", updated.to_rfc3339()));
    for (i, author) in entry.authors().iter().enumerate() {
        el.push(person("author", author).map_err(|e| e.within(&format!("author[{i}]")))?);
    }
    if let Some(content) = entry.content() {
        el.push(content_element(content));
    }
    for link in entry.links() {
        el.push(link_element(link));
    }
    if let Some(enclosure) = entry.enclosure() {
        let already_linked = entry
            .links()
            .iter()
            .any(|l| l.rel == Rel::Enclosure && l.href == enclosure.url);
        if !already_linked {
            el.push(link_element(
                &Link::new(enclosure.url.as_str())
                    .with_rel(Rel::Enclosure)
                    .with_type(enclosure.mime_type.as_str())
                    .with_length(enclosure.length),
            ));
        }
    }
    let summary = entry
        .summary()
        .cloned()
        .or_else(|| entry.description().map(Text::plain));
    if let Some(summary) = &summary {
        el.push(text_construct("summary", summary));
    }
    for category in entry.categories() {
        el.push(category_element(category));
    }
    for (i, contributor) in entry.contributors().iter().enumerate() {
        el.push(
            person("contributor", contributor)
                .map_err(|e| e.within(&format!("contributor[{i}]")))?,
        );
    }
    el.push_text_opt("published", entry.published().map(|d| d.to_rfc3339()));
    if let Some(source) = entry.source() {
        el.push(
            XmlElement::new("source")
                .child(XmlElement::text_element("title", source.title.as_str()))
                .child(XmlElement::new("link").attr("href", source.url.as_str())),
        );
    }
    el.push_text_opt("rights", entry.rights());

    for fragment in entry.extensions().atom_fragments() {
        fragment.merge_into(&mut el);
    }
    Ok(el)
}

fn person(name: &str, person: &Person) -> Result<XmlElement, ValidationError> {
    let person_name = require_some("name", person.name.as_deref())?;
    let mut el = XmlElement::new(name);
    el.push(XmlElement::text_element("name", person_name));
    el.push_text_opt("email", person.email.as_deref());
    el.push_text_opt("uri", person.uri.as_deref());
    Ok(el)
}

fn link_element(link: &Link) -> XmlElement {
    XmlElement::new("link")
        .attr("href", link.href.as_str())
        .attr("rel", link.rel.as_str())
        .attr_opt("type", link.mime_type.as_deref())
        .attr_opt("hreflang", link.hreflang.as_deref())
        .attr_opt("title", link.title.as_deref())
        .attr_opt("length", link.length.map(|l| l.to_string()))
}

fn category_element(category: &Category) -> XmlElement {
    XmlElement::new("category")
        .attr("term", category.term.as_str())
        .attr_opt("scheme", category.scheme.as_deref())
        .attr_opt("label", category.label.as_deref())
}

fn content_element(content: &Content) -> XmlElement {
    match &content.src {
        Some(src) => XmlElement::new("content")
            .attr("src", src.as_str())
            .attr_opt("type", content.src_type.as_deref()),
        None => text_construct("content", &content.body),
    }
}

/// An Atom text construct. `xhtml` is embedded in a namespaced `div`.
fn text_construct(name: &str, text: &Text) -> XmlElement {
    let el = XmlElement::new(name).attr("type", text.kind.as_str());
    match text.kind {
        TextType::Text | TextType::Html => el.text(text.value.as_str()),
        TextType::Cdata => el.cdata(text.value.as_str()),
        TextType::Xhtml => el.child(
            XmlElement::new("div")
                .attr("xmlns", XHTML_NS)
                .raw(text.value.as_str()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Node;
    use pretty_assertions::assert_eq;

    fn minimal_feed() -> Feed {
        let mut feed = Feed::new();
        feed.set_id("urn:feed")
            .set_title("T")
            .set_updated("2020-01-01T00:00:00Z")
            .unwrap();
        feed
    }

    fn child<'a>(el: &'a XmlElement, name: &str) -> Option<&'a XmlElement> {
        el.elements().find(|c| c.name == name)
    }

    #[test]
    fn test_required_feed_fields() {
        let mut feed = Feed::new();
        feed.set_title("T");
        let err = build(&feed, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("feed.id"), "{err}");
    }

    #[test]
    fn test_root_order_and_updated() {
        let root = build(&minimal_feed(), &RenderOptions::default()).unwrap();
        assert_eq!(root.attributes[0], ("xmlns".to_string(), ATOM_NS.to_string()));
        let names: Vec<_> = root.elements().map(|e| e.name.as_str()).take(3).collect();
        assert_eq!(names, ["id", "title", "updated"]);
        assert_eq!(
            child(&root, "updated").unwrap().children,
            vec![Node::Text("2020-01-01T00:00:00+00:00".into())]
        );
    }

    #[test]
    fn test_language_becomes_xml_lang() {
        let mut feed = minimal_feed();
        feed.set_language("de");
        let root = build(&feed, &RenderOptions::default()).unwrap();
        assert!(root
            .attributes
            .iter()
            .any(|(k, v)| k == "xml:lang" && v == "de"));
    }

    #[test]
    fn test_author_without_name_is_rejected() {
        let mut feed = minimal_feed();
        feed.add_author(Person {
            email: Some("x@example.com".into()),
            ..Default::default()
        });
        let err = build(&feed, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("feed.author[0].name"), "{err}");
    }

    #[test]
    fn test_entry_needs_title() {
        let mut feed = minimal_feed();
        feed.add_entry().set_id("urn:e");
        let err = build(&feed, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("entry[0].title"), "{err}");
    }

    #[test]
    fn test_xhtml_content_is_wrapped() {
        let mut feed = minimal_feed();
        feed.add_entry()
            .set_id("urn:e")
            .set_title("t")
            .set_content("<p>hi</p>", TextType::Xhtml)
            .unwrap();
        let root = build(&feed, &RenderOptions::default()).unwrap();
        let content = child(child(&root, "entry").unwrap(), "content").unwrap();
        let div = child(content, "div").unwrap();
        assert_eq!(div.attributes[0].1, XHTML_NS);
        assert_eq!(div.children, vec![Node::Raw("<p>hi</p>".into())]);
    }

    #[test]
    fn test_content_src_has_no_body() {
        let mut feed = minimal_feed();
        feed.add_entry()
            .set_id("urn:e")
            .set_title("t")
            .set_content_src("https://example.com/body", Some("text/html"));
        let root = build(&feed, &RenderOptions::default()).unwrap();
        let content = child(child(&root, "entry").unwrap(), "content").unwrap();
        assert!(content.children.is_empty());
        assert_eq!(content.attributes.len(), 2);
    }

    #[test]
    fn test_enclosure_becomes_link() {
        let mut feed = minimal_feed();
        feed.add_entry()
            .set_id("urn:e")
            .set_title("t")
            .set_enclosure(crate::model::Enclosure::new(
                "https://example.com/a.mp3",
                "audio/mpeg",
                10,
            ));
        let root = build(&feed, &RenderOptions::default()).unwrap();
        let entry = child(&root, "entry").unwrap();
        let link = child(entry, "link").unwrap();
        assert!(link
            .attributes
            .iter()
            .any(|(k, v)| k == "rel" && v == "enclosure"));
    }

    #[test]
    fn test_description_stands_in_for_summary() {
        let mut feed = minimal_feed();
        feed.add_entry()
            .set_id("urn:e")
            .set_title("t")
            .set_description("plain words");
        let root = build(&feed, &RenderOptions::default()).unwrap();
        let summary = child(child(&root, "entry").unwrap(), "summary").unwrap();
        assert_eq!(summary.children, vec![Node::Text("plain words".into())]);
    }
}
