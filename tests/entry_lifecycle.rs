//! Integration tests for building entries: adding, replacing, removing, and
//! how entry fields surface in the rendered documents.

use feedgen::{
    Category, Enclosure, Entry, EntryRef, FieldUpdate, Feed, Format, Link, Person, Rel,
    RenderOptions, TextType,
};

fn render_str(feed: &Feed, format: Format) -> String {
    let bytes = feedgen::render(feed, format, &RenderOptions::default()).unwrap();
    String::from_utf8(bytes).unwrap()
}

/// A feed with three titled entries, valid for both formats.
fn three_episode_feed() -> Feed {
    let mut feed = Feed::new();
    feed.set_id("https://example.com/feed.xml")
        .set_title("A Feed")
        .add_link(Link::new("https://example.com").with_rel(Rel::Alternate))
        .set_description("...");

    for (n, title) in ["The First Episode", "The Second Episode", "The Third Episode"]
        .into_iter()
        .enumerate()
    {
        feed.add_entry()
            .set_id(format!("https://example.com/podcast/episode-{}.mp3", n + 1))
            .set_title(title)
            .set_content("…", TextType::Text)
            .unwrap();
    }
    feed
}

// ============================================================================
// Entry sequence
// ============================================================================

#[test]
fn test_entry_count() {
    assert_eq!(three_episode_feed().entries().len(), 3);
}

#[test]
fn test_set_entries_copies_sequence() {
    let feed = three_episode_feed();
    let mut other = Feed::new();
    other.set_entries(feed.entries().to_vec());
    assert_eq!(other.entries().len(), 3);
    assert_eq!(other.entries(), feed.entries());
}

#[test]
fn test_remove_entry_by_index() {
    let mut feed = Feed::new();
    feed.add_entry()
        .set_id("https://example.com/podcast/episode-3.mp3")
        .set_title("The Third Episode");
    assert_eq!(feed.entries().len(), 1);
    feed.remove_entry(0);
    assert!(feed.entries().is_empty());
}

#[test]
fn test_remove_entry_by_value() {
    let mut feed = Feed::new();
    feed.add_entry()
        .set_id("https://example.com/podcast/episode-3.mp3")
        .set_title("The Third Episode");
    let entry = feed.entries()[0].clone();
    assert!(feed.remove_entry(&entry).is_some());
    assert!(feed.entries().is_empty());
}

#[test]
fn test_remove_entry_by_id_keeps_order() {
    let mut feed = three_episode_feed();
    feed.remove_entry(EntryRef::Id("https://example.com/podcast/episode-2.mp3"));
    let titles: Vec<_> = feed.entries().iter().filter_map(Entry::title).collect();
    assert_eq!(titles, ["The First Episode", "The Third Episode"]);
}

// ============================================================================
// Entry fields
// ============================================================================

#[test]
fn test_entry_items() {
    let mut feed = three_episode_feed();
    let entry = feed.add_entry();

    entry.set_title("A Title");
    assert_eq!(entry.title(), Some("A Title"));

    entry.set_authors(FieldUpdate::one(Person {
        email: Some("jdoe@example.com".into()),
        ..Default::default()
    }));
    assert!(entry.authors()[0].name.is_none());
    let authors = entry.set_authors(FieldUpdate::replace([
        Person::new("John Doe").with_email("jdoe@example.com")
    ]));
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name.as_deref(), Some("John Doe"));

    entry.add_contributor(Person::new("John Doe").with_email("jdoe@example.com"));
    assert_eq!(entry.contributors()[0].email.as_deref(), Some("jdoe@example.com"));

    entry.add_link(Link::new("https://example.com/entry").with_rel(Rel::Alternate));
    assert_eq!(entry.links()[0].href, "https://example.com/entry");
    assert_eq!(entry.links()[0].rel, Rel::Alternate);

    entry.set_guid("123", false);
    assert_eq!(entry.guid().unwrap().guid, "123");

    entry.set_updated("2017-02-05 13:26:58+01:00").unwrap();
    assert_eq!(entry.updated().unwrap().to_rfc3339(), "2017-02-05T13:26:58+01:00");

    entry.set_summary("A summary", TextType::Text).unwrap();
    assert_eq!(entry.summary().unwrap().value, "A summary");
    entry.set_description("A description");
    assert_eq!(entry.description(), Some("A description"));

    entry.set_pub_date("2017-02-05 13:26:58+01:00").unwrap();
    assert_eq!(entry.pub_date(), entry.published());

    entry.set_rights("Some rights");
    entry.set_source("https://example.com/entry", "A Title");
    assert_eq!(entry.source().unwrap().title, "A Title");
    entry.set_comments("Some comments");
    entry.set_enclosure(Enclosure::new("https://example.com/enclosure", "text/plain", 1));
    assert_eq!(entry.enclosure().unwrap().url, "https://example.com/enclosure");
    entry.set_ttl(8).unwrap();
    assert_eq!(entry.ttl(), Some(8));

    // The guid filled in the id, so both formats accept the entry
    assert!(feedgen::render(&feed, Format::Rss, &RenderOptions::default()).is_ok());
    assert!(feedgen::render(&feed, Format::Atom, &RenderOptions::default()).is_ok());
}

#[test]
fn test_ttl_must_be_positive() {
    let mut entry = Entry::new();
    assert!(entry.set_ttl(0).is_err());
    assert_eq!(entry.ttl(), None);
}

#[test]
fn test_timestamp_without_offset_rejected() {
    let mut entry = Entry::new();
    let err = entry.set_published("2017-02-05 13:26:58").unwrap_err();
    assert_eq!(err.field, "published");
}

// ============================================================================
// Rendered entry fields
// ============================================================================

#[test]
fn test_category_has_domain() {
    let mut feed = Feed::new();
    feed.set_id("https://example.com/feed.xml")
        .set_title("A Title")
        .add_link(Link::new("https://example.com").with_rel(Rel::Alternate))
        .set_description("A description");
    feed.add_entry()
        .set_id("https://example.com/podcast/episode-1.mp3")
        .set_title("An Entry Title")
        .add_category(
            Category::new("category")
                .with_scheme("https://example.com/category")
                .with_label("Category"),
        );

    let rss = render_str(&feed, Format::Rss);
    assert!(rss.contains(r#"domain="https://example.com/category""#), "{rss}");
}

#[test]
fn test_content_cdata_type() {
    let mut feed = Feed::new();
    feed.set_title("A Title").set_id("https://example.com/feed.xml");
    feed.add_entry()
        .set_id("http://lernfunk.de/media/654322/1")
        .set_title("some title")
        .set_content("content", TextType::Cdata)
        .unwrap();

    let atom = render_str(&feed, Format::Atom);
    assert!(
        atom.contains(r#"<content type="CDATA"><![CDATA[content]]></content>"#),
        "{atom}"
    );
}

#[test]
fn test_summary_html_type() {
    let mut feed = Feed::new();
    feed.set_title("A Title").set_id("https://example.com/feed.xml");
    feed.add_entry()
        .set_id("https://example.com/entry")
        .set_title("An Entry Title")
        .add_link(Link::new("https://example.com/entry"))
        .set_summary("<p>summary</p>", TextType::Html)
        .unwrap();

    let atom = render_str(&feed, Format::Atom);
    assert!(
        atom.contains(r#"<summary type="html">&lt;p&gt;summary&lt;/p&gt;</summary>"#),
        "{atom}"
    );
}

#[test]
fn test_xhtml_content_must_be_well_formed() {
    let mut entry = Entry::new();
    for body in ["<p>fish & chips</p>", "<p>fish&nbsp;chips</p>", "<p>open"] {
        let err = entry.set_content(body, TextType::Xhtml).unwrap_err();
        assert_eq!(err.field, "content", "{body}");
    }
    assert!(entry.content().is_none());

    entry
        .set_content("<p>fish &amp; chips&#160;</p>", TextType::Xhtml)
        .unwrap();
    assert!(entry.content().is_some());
}

#[test]
fn test_feed_without_id_fails_both_formats() {
    let mut feed = three_episode_feed();
    feed.set_id("");

    for format in [Format::Rss, Format::Atom] {
        let err = feedgen::render(&feed, format, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("feed.id"), "{format}: {err}");
    }
}

#[test]
fn test_entry_without_id_fails_both_formats() {
    let mut feed = three_episode_feed();
    feed.add_entry().set_title("anonymous");

    for format in [Format::Rss, Format::Atom] {
        let err = feedgen::render(&feed, format, &RenderOptions::default()).unwrap_err();
        assert!(err.to_string().contains("entry[3].id"), "{format}: {err}");
    }
}
