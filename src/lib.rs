//! Build RSS 2.0 and Atom 1.0 documents from one in-memory feed model.
//!
//! A [`Feed`] carries the union of what both formats can express. Rendering
//! maps it to one format, validating required fields first; fields the
//! target format has no place for are dropped and logged at debug level.
//! Namespaced extensions (podcast, Dublin Core, ...) are looked up by name in
//! a process-wide registry and attached to the feed and every entry.
//!
//! ```
//! use feedgen::{Feed, Format, Link, RenderOptions};
//!
//! let mut feed = Feed::new();
//! feed.set_id("https://example.com/feed.xml")
//!     .set_title("A Feed")
//!     .set_description("This is a cool feed!")
//!     .add_link(Link::new("https://example.com/"));
//! feed.add_entry()
//!     .set_id("https://example.com/entry")
//!     .set_title("First Element");
//!
//! let rss = feedgen::render(&feed, Format::Rss, &RenderOptions::default()).unwrap();
//! assert!(String::from_utf8(rss).unwrap().contains("<rss version=\"2.0\">"));
//! ```

pub mod config;
pub mod error;
pub mod ext;
pub mod model;
pub mod render;
pub mod util;
pub mod xml;

pub use error::{FeedError, FeedResult, ValidationError};
pub use model::{
    Category, Cloud, Content, Enclosure, Entry, EntryRef, FieldUpdate, Feed, Generator, Guid,
    Image, Link, Person, Rel, Source, Text, TextInput, TextType, Timestamp,
};
pub use render::{render, render_to_file, Encoding, EntryOrder, Format, RenderOptions, UpdatedPolicy};
