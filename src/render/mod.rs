//! Rendering a [`Feed`] as RSS 2.0 or Atom 1.0.
//!
//! Each serializer is a pure mapping from the shared model to an
//! [`XmlElement`] tree for its format, with an explicit table of fields the
//! format cannot represent. The tree is validated in full before a single
//! byte is written, so a failed render produces no output.
//!
//! - [`rss`] - `<rss version="2.0">` with one `<channel>`
//! - [`atom`] - `<feed xmlns="http://www.w3.org/2005/Atom">`
//! - [`encoding`] - transcoding of the finished document

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use serde::Deserialize;

use crate::error::{FeedError, FeedResult, ValidationError};
use crate::ext::Namespace;
use crate::model::{Entry, Feed, Timestamp};
use crate::util::write_atomic;
use crate::xml::{self, XmlElement};

pub mod atom;
pub mod encoding;
pub mod rss;

pub use encoding::Encoding;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Rss,
    Atom,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Rss => "rss",
            Format::Atom => "atom",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rss" => Ok(Format::Rss),
            "atom" => Ok(Format::Atom),
            other => Err(ValidationError::new(
                "format",
                format!("{other:?} is not one of rss, atom"),
            )),
        }
    }
}

/// What to do when the feed has no `updated` timestamp of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatedPolicy {
    /// Use the newest entry `updated`/`published`; fail if there is none.
    #[default]
    LatestEntry,
    /// Fail.
    Strict,
    /// Use the current time. Output is then no longer reproducible.
    Now,
}

/// Order in which entries are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryOrder {
    /// As added to the feed.
    #[default]
    Insertion,
    /// By `published` (else `updated`), newest first; ties keep insertion order.
    NewestFirst,
}

/// Per-call rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Indent the document. Never changes element order or text.
    pub pretty: bool,
    pub encoding: Encoding,
    pub updated_policy: UpdatedPolicy,
    pub entry_order: EntryOrder,
}

impl RenderOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the encoding from its label, e.g. `"ISO-8859-1"`.
    pub fn with_encoding(mut self, label: &str) -> FeedResult<Self> {
        self.encoding = label.parse()?;
        Ok(self)
    }
}

/// Renders `feed` in `format`.
pub fn render(feed: &Feed, format: Format, options: &RenderOptions) -> FeedResult<Vec<u8>> {
    let root = match format {
        Format::Rss => rss::build(feed, options)?,
        Format::Atom => atom::build(feed, options)?,
    };
    let utf8 = xml::write_document(&root, options.encoding.label(), options.pretty)?;
    options.encoding.encode(utf8)
}

/// Renders `feed` and writes it atomically to `path`.
///
/// Nothing is written when rendering fails; on a write failure the
/// destination keeps its previous content.
pub fn render_to_file(
    feed: &Feed,
    format: Format,
    path: &Path,
    options: &RenderOptions,
) -> FeedResult<()> {
    let bytes = render(feed, format, options)?;
    write_atomic(path, &bytes)?;
    tracing::info!(path = %path.display(), %format, bytes = bytes.len(), "Wrote feed");
    Ok(())
}

impl Feed {
    /// Renders the feed in `format`.
    pub fn render_as(&self, format: Format, options: &RenderOptions) -> FeedResult<Vec<u8>> {
        render(self, format, options)
    }

    pub fn rss(&self, options: &RenderOptions) -> FeedResult<Vec<u8>> {
        render(self, Format::Rss, options)
    }

    pub fn atom(&self, options: &RenderOptions) -> FeedResult<Vec<u8>> {
        render(self, Format::Atom, options)
    }

    pub fn rss_file(&self, path: impl AsRef<Path>, options: &RenderOptions) -> FeedResult<()> {
        render_to_file(self, Format::Rss, path.as_ref(), options)
    }

    pub fn atom_file(&self, path: impl AsRef<Path>, options: &RenderOptions) -> FeedResult<()> {
        render_to_file(self, Format::Atom, path.as_ref(), options)
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Entries paired with their position in the feed, in output order.
pub(crate) fn ordered_entries(feed: &Feed, order: EntryOrder) -> Vec<(usize, &Entry)> {
    let mut entries: Vec<_> = feed.entries().iter().enumerate().collect();
    if order == EntryOrder::NewestFirst {
        // Stable: entries without a date keep their relative order at the end
        entries.sort_by(|(_, a), (_, b)| b.sort_key().cmp(&a.sort_key()));
        tracing::debug!(entries = entries.len(), "Sorted entries newest first");
    }
    entries
}

/// Feed `updated`, or a substitute chosen by `policy`.
pub(crate) fn resolve_updated(
    feed: &Feed,
    policy: UpdatedPolicy,
) -> Result<Timestamp, ValidationError> {
    if let Some(updated) = feed.updated() {
        return Ok(updated);
    }
    let resolved = match policy {
        UpdatedPolicy::Strict => None,
        UpdatedPolicy::Now => Some(Utc::now().fixed_offset()),
        UpdatedPolicy::LatestEntry => feed
            .entries()
            .iter()
            .filter_map(|e| e.updated().max(e.published()))
            .max(),
    };
    match resolved {
        Some(updated) => {
            tracing::debug!(?policy, %updated, "Synthesised feed updated timestamp");
            Ok(updated)
        }
        None => Err(ValidationError::missing("feed.updated")),
    }
}

/// Namespaces used by the feed's and entries' extensions, first use first,
/// one per prefix.
pub(crate) fn extension_namespaces(feed: &Feed) -> Vec<Namespace> {
    let mut namespaces: Vec<Namespace> = Vec::new();
    let all = feed
        .extensions()
        .namespaces()
        .chain(feed.entries().iter().flat_map(|e| e.extensions().namespaces()));
    for ns in all {
        if !namespaces.iter().any(|known| known.prefix == ns.prefix) {
            namespaces.push(ns);
        }
    }
    namespaces
}

pub(crate) fn declare_namespace(root: &mut XmlElement, ns: Namespace) {
    root.push_attr(format!("xmlns:{}", ns.prefix), ns.uri);
}

/// A field one format has no place for.
pub(crate) struct Omission<T: 'static> {
    pub field: &'static str,
    pub present: fn(&T) -> bool,
}

/// Logs every field that is set but dropped for `format`.
pub(crate) fn log_omissions<T>(format: Format, owner: &str, table: &[Omission<T>], value: &T) {
    for omission in table {
        if (omission.present)(value) {
            tracing::debug!(
                %format,
                owner,
                field = omission.field,
                "Field has no representation in this format, omitted"
            );
        }
    }
}

/// Maps an error from inside an entry to its position in the feed.
pub(crate) fn in_entry(index: usize) -> impl Fn(ValidationError) -> FeedError {
    move |e| FeedError::Validation(e.within(&format!("entry[{index}]")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_resolve_updated_policies() {
        let mut feed = Feed::new();
        feed.add_entry().set_updated("2020-05-01T00:00:00Z").unwrap();
        feed.add_entry()
            .clear_updated()
            .set_published("2021-05-01T00:00:00Z")
            .unwrap();

        let latest = resolve_updated(&feed, UpdatedPolicy::LatestEntry).unwrap();
        assert_eq!(latest.year(), 2021);
        assert!(resolve_updated(&feed, UpdatedPolicy::Strict).is_err());

        feed.set_updated("2019-01-01T00:00:00Z").unwrap();
        assert_eq!(
            resolve_updated(&feed, UpdatedPolicy::Strict).unwrap().year(),
            2019
        );
    }

    #[test]
    fn test_resolve_updated_without_entries_fails() {
        let feed = Feed::new();
        let err = resolve_updated(&feed, UpdatedPolicy::LatestEntry).unwrap_err();
        assert_eq!(err.field, "feed.updated");
        assert!(resolve_updated(&feed, UpdatedPolicy::Now).is_ok());
    }

    #[test]
    fn test_newest_first_is_stable() {
        let mut feed = Feed::new();
        for (id, date) in [("a", None), ("b", Some("2020-01-01T00:00:00Z")), ("c", None), ("d", Some("2021-01-01T00:00:00Z"))] {
            let entry = feed.add_entry();
            entry.set_id(id).clear_updated();
            if let Some(date) = date {
                entry.set_published(date).unwrap();
            }
        }
        let ids: Vec<_> = ordered_entries(&feed, EntryOrder::NewestFirst)
            .into_iter()
            .map(|(_, e)| e.id())
            .collect();
        assert_eq!(ids, ["d", "b", "a", "c"]);

        let ids: Vec<_> = ordered_entries(&feed, EntryOrder::Insertion)
            .into_iter()
            .map(|(i, _)| i)
            .collect();
        assert_eq!(ids, [0, 1, 2, 3]);
    }

    #[test]
    fn test_namespaces_deduplicated() {
        let mut feed = Feed::new();
        feed.add_entry();
        feed.load_extension("dc").unwrap();
        feed.load_extension("podcast").unwrap();
        let prefixes: Vec<_> = extension_namespaces(&feed).iter().map(|n| n.prefix).collect();
        assert_eq!(prefixes, ["dc", "itunes"]);
    }

    #[test]
    fn test_options_encoding_label() {
        let options = RenderOptions::default().with_encoding("iso-8859-1").unwrap();
        assert_eq!(options.encoding, Encoding::Latin1);
        assert!(RenderOptions::default().with_encoding("koi8-r").is_err());
    }
}
