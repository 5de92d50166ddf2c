//! Namespace extensions for feeds and entries.
//!
//! An extension is registered under a name with two constructors, one for
//! the feed-level object and one for the entry-level object. Loading it on a
//! [`Feed`](crate::Feed) attaches it to the feed and to every entry, present
//! and future. Callers then configure the instance directly and the
//! serializers ask it for a [`Fragment`] per rendered element.
//!
//! # Architecture
//!
//! - [`registry`] - process-wide name -> constructor lookup
//! - [`container`] - the per-feed / per-entry set of loaded instances
//! - bundled extensions: [`podcast`], [`torrent`], [`dc`], [`syndication`], [`base`]
//!
//! # Example
//!
//! ```
//! use feedgen::ext::podcast::{PodcastEntry, PodcastFeed};
//! use feedgen::Feed;
//!
//! let mut feed = Feed::new();
//! feed.load_extension("podcast")?;
//! if let Some(show) = feed.extension_mut::<PodcastFeed>("podcast") {
//!     show.author = Some("John Doe".into());
//! }
//! let episode = feed.add_entry();
//! assert!(episode.extension::<PodcastEntry>("podcast").is_some());
//! # Ok::<(), feedgen::FeedError>(())
//! ```

use std::any::Any;
use std::fmt;

use crate::error::ValidationError;
use crate::xml::XmlElement;

pub mod base;
pub mod container;
pub mod dc;
pub mod podcast;
pub mod registry;
pub mod syndication;
pub mod torrent;

pub use container::ExtensionContainer;
pub use registry::{register, registered_names, resolve, ExtensionFactory, ExtensionRegistry};

/// An XML namespace an extension writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: &'static str,
    pub uri: &'static str,
}

/// Which kind of parent an extension instance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Feed,
    Entry,
}

/// What an extension adds to one rendered element: extra attributes on the
/// element itself and extra child elements after its core children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn push(&mut self, element: XmlElement) {
        self.children.push(element);
    }

    /// Appends `<name>value</name>` when `value` is set.
    pub fn push_text_opt(&mut self, name: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.children.push(XmlElement::text_element(name, value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// `Some(self)` unless nothing was added.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// Merges the fragment into `element`.
    pub fn merge_into(self, element: &mut XmlElement) {
        element.attributes.extend(self.attributes);
        for child in self.children {
            element.push(child);
        }
    }
}

/// A loaded extension instance.
///
/// Implementors are plain structs whose public fields are the extension's
/// settings; `Clone + PartialEq` is all that is needed for the object-safe
/// plumbing in [`ExtensionObject`].
pub trait Extension: ExtensionObject + fmt::Debug + 'static {
    /// Namespaces the fragments use. Declared once on the document root.
    fn namespaces(&self) -> &'static [Namespace] {
        &[]
    }

    /// Checks the extension's own fields before a render.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    /// Contribution to the enclosing `<channel>` or `<item>`.
    fn rss_fragment(&self) -> Option<Fragment> {
        None
    }

    /// Contribution to the enclosing `<feed>` or `<entry>`.
    fn atom_fragment(&self) -> Option<Fragment> {
        None
    }
}

/// Object-safe helpers for `dyn Extension`, implemented for every
/// `Extension + Clone + PartialEq`.
pub trait ExtensionObject {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_box(&self) -> Box<dyn Extension>;
    fn dyn_eq(&self, other: &dyn Extension) -> bool;
}

impl<T> ExtensionObject for T
where
    T: Extension + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn Extension> {
        Box::new(self.clone())
    }

    fn dyn_eq(&self, other: &dyn Extension) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

impl Clone for Box<dyn Extension> {
    fn clone(&self) -> Self {
        (**self).clone_box()
    }
}

impl PartialEq for Box<dyn Extension> {
    fn eq(&self, other: &Self) -> bool {
        (**self).dyn_eq(&**other)
    }
}

/// Entry-side placeholder for extensions that only act on the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inert;

impl Extension for Inert {}
