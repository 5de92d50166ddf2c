//! Integration tests for the rendered documents: exact output for a small
//! feed, determinism, ordering, encodings, and atomic file output.

use feedgen::{
    Encoding, EntryOrder, Feed, FeedError, Format, Link, Person, Rel, RenderOptions, TextType,
    UpdatedPolicy,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn fixed_feed() -> Feed {
    let mut feed = Feed::new();
    feed.set_id("https://example.com/feed.xml")
        .set_title("A Feed")
        .set_description("This is a cool feed!")
        .add_link(Link::new("https://example.com/"))
        .set_generator(None)
        .set_docs(None)
        .set_updated("2020-01-15T00:00:00Z")
        .unwrap();
    feed.add_entry()
        .set_id("https://example.com/entry")
        .set_title("First Element")
        .set_updated("2020-01-15T00:00:00Z")
        .unwrap();
    feed
}

fn render_str(feed: &Feed, format: Format, options: &RenderOptions) -> String {
    String::from_utf8(feedgen::render(feed, format, options).unwrap()).unwrap()
}

// ============================================================================
// Exact output
// ============================================================================

#[test]
fn test_minimal_rss_document() {
    let rss = render_str(&fixed_feed(), Format::Rss, &RenderOptions::pretty());
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>A Feed</title>
    <link>https://example.com/</link>
    <description>This is a cool feed!</description>
    <lastBuildDate>Wed, 15 Jan 2020 00:00:00 +0000</lastBuildDate>
    <item>
      <title>First Element</title>
      <guid isPermaLink="false">https://example.com/entry</guid>
    </item>
  </channel>
</rss>
"#;
    assert_eq!(rss, expected);
}

#[test]
fn test_minimal_atom_document() {
    let atom = render_str(&fixed_feed(), Format::Atom, &RenderOptions::pretty());
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>https://example.com/feed.xml</id>
  <title>A Feed</title>
  <updated>2020-01-15T00:00:00+00:00</updated>
  <link href="https://example.com/" rel="alternate"/>
  <subtitle>This is a cool feed!</subtitle>
  <entry>
    <id>https://example.com/entry</id>
    <title>First Element</title>
    <updated>2020-01-15T00:00:00+00:00</updated>
  </entry>
</feed>
"#;
    assert_eq!(atom, expected);
}

#[test]
fn test_pretty_and_compact_differ_only_in_whitespace() {
    let feed = fixed_feed();
    for format in [Format::Rss, Format::Atom] {
        let compact = render_str(&feed, format, &RenderOptions::default());
        let pretty = render_str(&feed, format, &RenderOptions::pretty());
        let squeeze = |s: &str| s.lines().map(str::trim).collect::<String>();
        assert_eq!(squeeze(&pretty), squeeze(&compact));
        assert!(!compact.contains('\n'));
    }
}

// ============================================================================
// Determinism and ordering
// ============================================================================

#[test]
fn test_rendering_is_idempotent() {
    let feed = fixed_feed();
    for format in [Format::Rss, Format::Atom] {
        let first = feedgen::render(&feed, format, &RenderOptions::default()).unwrap();
        let second = feedgen::render(&feed, format, &RenderOptions::default()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_newest_first_ordering() {
    let mut feed = fixed_feed();
    feed.add_entry()
        .set_id("urn:later")
        .set_title("Later")
        .set_published("2021-06-01T00:00:00Z")
        .unwrap();

    let options = RenderOptions {
        entry_order: EntryOrder::NewestFirst,
        ..Default::default()
    };
    let atom = render_str(&feed, Format::Atom, &options);
    let later = atom.find("urn:later").unwrap();
    let first = atom.find("https://example.com/entry").unwrap();
    assert!(later < first, "{atom}");

    let insertion = render_str(&feed, Format::Atom, &RenderOptions::default());
    assert!(insertion.find("urn:later").unwrap() > insertion.find("https://example.com/entry").unwrap());
}

#[test]
fn test_strict_policy_requires_feed_updated() {
    let mut feed = Feed::new();
    feed.set_id("urn:feed").set_title("T");
    feed.add_entry().set_id("urn:e").set_title("e");

    let strict = RenderOptions {
        updated_policy: UpdatedPolicy::Strict,
        ..Default::default()
    };
    let err = feedgen::render(&feed, Format::Atom, &strict).unwrap_err();
    assert!(err.to_string().contains("feed.updated"), "{err}");
    assert!(feedgen::render(&feed, Format::Atom, &RenderOptions::default()).is_ok());
}

proptest! {
    #[test]
    fn prop_insertion_order_is_preserved(count in 0usize..12) {
        let mut feed = fixed_feed();
        feed.remove_entry(0);
        for i in 0..count {
            feed.add_entry().set_id(format!("urn:entry:{i}")).set_title(format!("#{i}"));
        }

        for format in [Format::Rss, Format::Atom] {
            let doc = render_str(&feed, format, &RenderOptions::default());
            let positions: Vec<usize> = (0..count)
                .map(|i| doc.find(&format!("urn:entry:{i}<")).unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            let items = match format {
                Format::Rss => doc.matches("<item>").count(),
                Format::Atom => doc.matches("<entry>").count(),
            };
            prop_assert_eq!(items, count);
        }
    }
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn test_self_link_declares_atom_namespace() {
    let mut feed = fixed_feed();
    feed.add_link(Link::new("https://example.com/feed.xml").with_rel(Rel::SelfLink));
    let rss = render_str(&feed, Format::Rss, &RenderOptions::default());
    assert!(rss.contains(r#"<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">"#), "{rss}");
    assert!(rss.contains(r#"<atom:link href="https://example.com/feed.xml" rel="self"/>"#), "{rss}");
}

#[test]
fn test_extension_namespace_declared_once() {
    let mut feed = fixed_feed();
    feed.add_entry().set_id("urn:two").set_title("two");
    feed.load_extension("dc").unwrap();
    let rss = render_str(&feed, Format::Rss, &RenderOptions::default());
    assert_eq!(rss.matches("xmlns:dc=").count(), 1);
}

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn test_ascii_output_uses_character_references() {
    let mut feed = fixed_feed();
    feed.set_title("Café");
    let options = RenderOptions::default().with_encoding("US-ASCII").unwrap();
    let bytes = feedgen::render(&feed, Format::Atom, &options).unwrap();
    assert!(bytes.is_ascii());
    let doc = String::from_utf8(bytes).unwrap();
    assert!(doc.starts_with(r#"<?xml version="1.0" encoding="US-ASCII"?>"#));
    assert!(doc.contains("<title>Caf&#233;</title>"), "{doc}");
}

#[test]
fn test_unencodable_cdata_fails() {
    let mut feed = fixed_feed();
    feed.entry_mut(0)
        .unwrap()
        .set_content("naïve", TextType::Cdata)
        .unwrap();
    let options = RenderOptions {
        encoding: Encoding::Ascii,
        ..Default::default()
    };
    let err = feedgen::render(&feed, Format::Rss, &options).unwrap_err();
    assert!(matches!(err, FeedError::Unencodable { ch: 'ï', .. }), "{err}");
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_render_to_file_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.atom");
    let feed = fixed_feed();

    feed.atom_file(&path, &RenderOptions::default()).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert_eq!(written, feed.atom(&RenderOptions::default()).unwrap());
}

#[test]
fn test_failed_render_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feed.rss");
    std::fs::write(&path, "previous").unwrap();

    let mut feed = fixed_feed();
    feed.add_author(Person::new("anonymous"));
    feed.add_entry().set_title("no id");
    assert!(feed.rss_file(&path, &RenderOptions::default()).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
