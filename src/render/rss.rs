//! RSS 2.0 serializer.
//!
//! Channel elements follow the order of the RSS 2.0 board specification;
//! extension fragments come after the core channel fields and before the
//! items, and at the end of each item.

use chrono::Weekday;

use super::{
    declare_namespace, extension_namespaces, in_entry, log_omissions, ordered_entries,
    resolve_updated, Format, Omission, RenderOptions,
};
use crate::error::{FeedResult, ValidationError};
use crate::ext::Namespace;
use crate::model::validate::{require, require_some};
use crate::model::{Entry, Feed, Link, Rel, Text, TextType};
use crate::xml::XmlElement;

const ATOM_NS: Namespace = Namespace {
    prefix: "atom",
    uri: "http://www.w3.org/2005/Atom",
};

const CONTENT_NS: Namespace = Namespace {
    prefix: "content",
    uri: "http://purl.org/rss/1.0/modules/content/",
};

const FEED_OMISSIONS: &[Omission<Feed>] = &[
    Omission {
        field: "icon",
        present: |f| f.icon().is_some(),
    },
    Omission {
        field: "logo",
        present: |f| f.logo().is_some(),
    },
    Omission {
        field: "contributors",
        present: |f| !f.contributors().is_empty(),
    },
    Omission {
        field: "category.label",
        present: |f| f.categories().iter().any(|c| c.label.is_some()),
    },
];

const ENTRY_OMISSIONS: &[Omission<Entry>] = &[
    Omission {
        field: "updated",
        present: |e| e.updated().is_some() && e.published().is_some(),
    },
    Omission {
        field: "contributors",
        present: |e| !e.contributors().is_empty(),
    },
    Omission {
        field: "rights",
        present: |e| e.rights().is_some(),
    },
    Omission {
        field: "content.src",
        present: |e| e.content().is_some_and(|c| c.src.is_some()),
    },
    Omission {
        field: "authors",
        present: |e| e.authors().iter().any(|p| p.email.is_none()),
    },
];

/// Builds the `<rss>` document tree.
pub(crate) fn build(feed: &Feed, options: &RenderOptions) -> FeedResult<XmlElement> {
    require("feed.id", feed.id())?;
    require("feed.title", feed.title())?;
    let link = channel_link(feed);
    let description = require_some("feed.description", feed.description())?;
    feed.extensions()
        .validate()
        .map_err(|e| e.within("feed"))?;

    // Items first, so nothing is assembled for an invalid feed
    let mut items = Vec::with_capacity(feed.entries().len());
    for (index, entry) in ordered_entries(feed, options.entry_order) {
        items.push(build_item(entry).map_err(in_entry(index))?);
        log_omissions(Format::Rss, "entry", ENTRY_OMISSIONS, entry);
    }
    log_omissions(Format::Rss, "feed", FEED_OMISSIONS, feed);

    let self_link = feed.link_with_rel(Rel::SelfLink);
    let mut rss = XmlElement::new("rss").attr("version", "2.0");
    if self_link.is_some() {
        declare_namespace(&mut rss, ATOM_NS);
    }
    if feed.entries().iter().any(has_body) {
        declare_namespace(&mut rss, CONTENT_NS);
    }
    for ns in extension_namespaces(feed) {
        declare_namespace(&mut rss, ns);
    }

    let mut channel = XmlElement::new("channel");
    channel.push(XmlElement::text_element("title", feed.title()));
    channel.push(XmlElement::text_element("link", link));
    channel.push(XmlElement::text_element("description", description));
    if let Some(self_link) = self_link {
        channel.push(
            XmlElement::new("atom:link")
                .attr("href", self_link.href.as_str())
                .attr("rel", "self")
                .attr_opt("type", self_link.mime_type.as_deref()),
        );
    }
    for category in feed.categories() {
        channel.push(
            XmlElement::text_element("category", category.term.as_str())
                .attr_opt("domain", category.scheme.as_deref()),
        );
    }
    if let Some(cloud) = feed.cloud() {
        channel.push(
            XmlElement::new("cloud")
                .attr("domain", cloud.domain.as_str())
                .attr("port", cloud.port.to_string())
                .attr("path", cloud.path.as_str())
                .attr("registerProcedure", cloud.register_procedure.as_str())
                .attr("protocol", cloud.protocol.as_str()),
        );
    }
    channel.push_text_opt("copyright", feed.rights());
    channel.push_text_opt("docs", feed.docs());
    if let Some(generator) = feed.generator() {
        let text = match &generator.version {
            Some(version) => format!("{} {}", generator.name, version),
            None => generator.name.clone(),
        };
        channel.push(XmlElement::text_element("generator", text));
    }
    if let Some(image) = feed.image() {
        let mut el = XmlElement::new("image");
        el.push(XmlElement::text_element("url", image.url.as_str()));
        el.push(XmlElement::text_element(
            "title",
            image.title.as_deref().unwrap_or(feed.title()),
        ));
        el.push(XmlElement::text_element(
            "link",
            image.link.as_deref().unwrap_or(link),
        ));
        el.push_text_opt("width", image.width.map(|w| w.to_string()));
        el.push_text_opt("height", image.height.map(|h| h.to_string()));
        el.push_text_opt("description", image.description.as_deref());
        channel.push(el);
    }
    channel.push_text_opt("language", feed.language());
    channel.push_text_opt(
        "lastBuildDate",
        resolve_updated(feed, options.updated_policy)
            .ok()
            .map(|d| d.to_rfc2822()),
    );
    let editor = feed
        .managing_editor()
        .map(str::to_string)
        .or_else(|| feed.authors().iter().find_map(|a| a.mailbox()));
    channel.push_text_opt("managingEditor", editor);
    channel.push_text_opt("pubDate", feed.pub_date().map(|d| d.to_rfc2822()));
    channel.push_text_opt("rating", feed.rating());
    if !feed.skip_hours().is_empty() {
        let mut hours = XmlElement::new("skipHours");
        for hour in feed.skip_hours() {
            hours.push(XmlElement::text_element("hour", hour.to_string()));
        }
        channel.push(hours);
    }
    if !feed.skip_days().is_empty() {
        let mut days = XmlElement::new("skipDays");
        for day in feed.skip_days() {
            days.push(XmlElement::text_element("day", day_name(*day)));
        }
        channel.push(days);
    }
    if let Some(input) = feed.text_input() {
        channel.push(
            XmlElement::new("textInput")
                .child(XmlElement::text_element("title", input.title.as_str()))
                .child(XmlElement::text_element("description", input.description.as_str()))
                .child(XmlElement::text_element("name", input.name.as_str()))
                .child(XmlElement::text_element("link", input.link.as_str())),
        );
    }
    channel.push_text_opt("ttl", feed.ttl().map(|t| t.to_string()));
    channel.push_text_opt("webMaster", feed.webmaster());

    for fragment in feed.extensions().rss_fragments() {
        fragment.merge_into(&mut channel);
    }
    for item in items {
        channel.push(item);
    }

    rss.push(channel);
    Ok(rss)
}

/// First alternate link, else any link that is not `self`, else the id.
/// First alternate link, else the first non-self link, else the feed id.
fn channel_link(feed: &Feed) -> &str {
    feed.link_with_rel(Rel::Alternate)
        .or_else(|| feed.links().find(|l| l.rel != Rel::SelfLink))
        .map_or(feed.id(), |l| l.href.as_str())
}

fn has_body(entry: &Entry) -> bool {
    entry
        .content()
        .is_some_and(|c| c.src.is_none() && !c.body.value.is_empty())
}

fn build_item(entry: &Entry) -> Result<XmlElement, ValidationError> {
    require("id", entry.id())?;
    let description = entry
        .description()
        .map(Text::plain)
        .or_else(|| entry.summary().cloned());
    if entry.title().is_none() && description.is_none() {
        return Err(ValidationError::new(
            "title",
            "an item needs a title or a description",
        ));
    }
    entry.extensions().validate()?;

    let mut item = XmlElement::new("item");
    item.push_text_opt("title", entry.title());
    let link = entry
        .links()
        .find(|l| l.rel == Rel::Alternate)
        .or_else(|| entry.links().find(|l| l.rel != Rel::Enclosure && l.rel != Rel::SelfLink));
    item.push_text_opt("link", link.map(|l| l.href.as_str()));
    if let Some(description) = &description {
        item.push(text_body("description", description));
    }
    for author in entry.authors() {
        item.push_text_opt("author", author.mailbox());
    }
    for category in entry.categories() {
        item.push(
            XmlElement::text_element("category", category.term.as_str())
                .attr_opt("domain", category.scheme.as_deref()),
        );
    }
    item.push_text_opt("comments", entry.comments());
    if let Some(enclosure) = entry.enclosure() {
        item.push(
            XmlElement::new("enclosure")
                .attr("url", enclosure.url.as_str())
                .attr("length", enclosure.length.to_string())
                .attr("type", enclosure.mime_type.as_str()),
        );
    } else if let Some(link) = entry.links().find(|l| l.rel == Rel::Enclosure) {
        item.push(enclosure_from_link(link));
    }
    item.push(match entry.guid() {
        Some(guid) => XmlElement::text_element("guid", guid.guid.as_str())
            .attr("isPermaLink", guid.is_permalink.to_string()),
        None => XmlElement::text_element("guid", entry.id()).attr("isPermaLink", "false"),
    });
    item.push_text_opt("pubDate", entry.published().map(|d| d.to_rfc2822()));
    if let Some(source) = entry.source() {
        item.push(
            XmlElement::text_element("source", source.title.as_str())
                .attr("url", source.url.as_str()),
        );
    }
    item.push_text_opt("ttl", entry.ttl().map(|t| t.to_string()));
    if has_body(entry) {
        if let Some(content) = entry.content() {
            item.push(text_body("content:encoded", &content.body));
        }
    }

    for fragment in entry.extensions().rss_fragments() {
        fragment.merge_into(&mut item);
    }
    Ok(item)
}

/// RSS carries HTML as escaped text; only `CDATA` bodies change form.
fn text_body(name: &str, text: &Text) -> XmlElement {
    match text.kind {
        TextType::Cdata => XmlElement::new(name).cdata(text.value.as_str()),
        _ => XmlElement::text_element(name, text.value.as_str()),
    }
}

fn enclosure_from_link(link: &Link) -> XmlElement {
    XmlElement::new("enclosure")
        .attr("url", link.href.as_str())
        .attr("length", link.length.unwrap_or(0).to_string())
        .attr(
            "type",
            link.mime_type.as_deref().unwrap_or("application/octet-stream"),
        )
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
