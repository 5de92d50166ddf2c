//! The feed/entry data model shared by both output formats.
//!
//! - [`Feed`] owns its ordered [`Entry`] sequence and the extensions loaded
//!   for the whole feed
//! - [`types`] holds the structured values (links, people, categories...)
//! - [`validate`] holds the per-field rules and the list-field update helpers

mod entry;
mod feed;
pub mod types;
pub mod validate;

pub use entry::Entry;
pub use feed::{EntryRef, Feed, RSS_DOCS};
pub use types::{
    Category, Cloud, Content, Enclosure, Generator, Guid, Image, Link, Person, Rel, Source, Text,
    TextInput, TextType,
};
pub use validate::{FieldList, FieldUpdate, IntoTimestamp, Timestamp};
