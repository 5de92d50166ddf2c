use std::collections::BTreeSet;

use chrono::Weekday;

use super::entry::Entry;
use super::types::{Category, Cloud, Generator, Image, Link, Person, Rel, TextInput};
use super::validate::{check_hour, check_positive, FieldList, FieldUpdate, IntoTimestamp, Timestamp};
use crate::error::{FeedResult, ValidationError};
use crate::ext::{registry, Extension, ExtensionContainer, ExtensionFactory, Scope};

/// Default RSS `docs` value: where the channel format is documented.
pub const RSS_DOCS: &str = "https://www.rssboard.org/rss-specification";

/// Selects an entry for [`Feed::remove_entry`].
#[derive(Debug, Clone, Copy)]
pub enum EntryRef<'a> {
    /// Position in the entry sequence.
    Index(usize),
    /// First entry with this id.
    Id(&'a str),
    /// First entry equal to this one.
    Entry(&'a Entry),
}

impl From<usize> for EntryRef<'_> {
    fn from(index: usize) -> Self {
        EntryRef::Index(index)
    }
}

impl<'a> From<&'a Entry> for EntryRef<'a> {
    fn from(entry: &'a Entry) -> Self {
        EntryRef::Entry(entry)
    }
}

/// A syndication feed: channel metadata, ordered entries and extensions.
///
/// The model carries the union of RSS and Atom fields; each serializer maps
/// what its format can represent and drops the rest. Cloning a feed deep-copies
/// its entries and extension instances.
#[derive(Debug, Clone)]
pub struct Feed {
    id: String,
    title: String,
    description: Option<String>,
    updated: Option<Timestamp>,
    pub_date: Option<Timestamp>,
    links: FieldList<Link>,
    authors: FieldList<Person>,
    contributors: FieldList<Person>,
    categories: FieldList<Category>,
    icon: Option<String>,
    logo: Option<String>,
    rights: Option<String>,
    language: Option<String>,
    docs: Option<String>,
    webmaster: Option<String>,
    managing_editor: Option<String>,
    generator: Option<Generator>,
    ttl: Option<u32>,
    skip_hours: BTreeSet<u8>,
    skip_days: Vec<Weekday>,
    image: Option<Image>,
    cloud: Option<Cloud>,
    text_input: Option<TextInput>,
    rating: Option<String>,
    entries: Vec<Entry>,
    extensions: ExtensionContainer,
    /// Extensions attached to every entry that joins this feed.
    auto_extensions: Vec<(String, ExtensionFactory)>,
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

impl Feed {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: None,
            updated: None,
            pub_date: None,
            links: FieldList::default(),
            authors: FieldList::default(),
            contributors: FieldList::default(),
            categories: FieldList::default(),
            icon: None,
            logo: None,
            rights: None,
            language: None,
            docs: Some(RSS_DOCS.to_string()),
            webmaster: None,
            managing_editor: None,
            generator: Some(Generator::default()),
            ttl: None,
            skip_hours: BTreeSet::new(),
            skip_days: Vec::new(),
            image: None,
            cloud: None,
            text_input: None,
            rating: None,
            entries: Vec::new(),
            extensions: ExtensionContainer::new(Scope::Feed),
            auto_extensions: Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Required scalars
    // ------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// RSS `description`, Atom `subtitle`.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Alias of [`Feed::description`] under its Atom name.
    pub fn subtitle(&self) -> Option<&str> {
        self.description()
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) -> &mut Self {
        self.set_description(subtitle)
    }

    // ------------------------------------------------------------------------
    // Dates
    // ------------------------------------------------------------------------

    pub fn updated(&self) -> Option<Timestamp> {
        self.updated
    }

    pub fn set_updated(&mut self, updated: impl IntoTimestamp) -> Result<&mut Self, ValidationError> {
        self.updated = Some(updated.into_timestamp("updated")?);
        Ok(self)
    }

    /// RSS channel `pubDate`.
    pub fn pub_date(&self) -> Option<Timestamp> {
        self.pub_date
    }

    pub fn set_pub_date(&mut self, pub_date: impl IntoTimestamp) -> Result<&mut Self, ValidationError> {
        self.pub_date = Some(pub_date.into_timestamp("pub_date")?);
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Structured lists
    // ------------------------------------------------------------------------

    pub fn links(&self) -> &FieldList<Link> {
        &self.links
    }

    pub fn links_mut(&mut self) -> &mut FieldList<Link> {
        &mut self.links
    }

    pub fn add_link(&mut self, link: Link) -> &mut Self {
        self.links.push(link);
        self
    }

    pub fn set_links(&mut self, update: FieldUpdate<Link>) -> &[Link] {
        self.links.apply(update)
    }

    /// First link with the given relation.
    pub fn link_with_rel(&self, rel: Rel) -> Option<&Link> {
        self.links.find(|link| link.rel == rel)
    }

    pub fn authors(&self) -> &FieldList<Person> {
        &self.authors
    }

    pub fn authors_mut(&mut self) -> &mut FieldList<Person> {
        &mut self.authors
    }

    pub fn add_author(&mut self, author: Person) -> &mut Self {
        self.authors.push(author);
        self
    }

    pub fn set_authors(&mut self, update: FieldUpdate<Person>) -> &[Person] {
        self.authors.apply(update)
    }

    pub fn contributors(&self) -> &FieldList<Person> {
        &self.contributors
    }

    pub fn contributors_mut(&mut self) -> &mut FieldList<Person> {
        &mut self.contributors
    }

    pub fn add_contributor(&mut self, contributor: Person) -> &mut Self {
        self.contributors.push(contributor);
        self
    }

    pub fn set_contributors(&mut self, update: FieldUpdate<Person>) -> &[Person] {
        self.contributors.apply(update)
    }

    pub fn categories(&self) -> &FieldList<Category> {
        &self.categories
    }

    pub fn categories_mut(&mut self) -> &mut FieldList<Category> {
        &mut self.categories
    }

    pub fn add_category(&mut self, category: Category) -> &mut Self {
        self.categories.push(category);
        self
    }

    pub fn set_categories(&mut self, update: FieldUpdate<Category>) -> &[Category] {
        self.categories.apply(update)
    }

    // ------------------------------------------------------------------------
    // Optional scalars
    // ------------------------------------------------------------------------

    /// Atom `icon`: small square image.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn set_icon(&mut self, icon: impl Into<String>) -> &mut Self {
        self.icon = Some(icon.into());
        self
    }

    /// Atom `logo`: larger rectangular image.
    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn set_logo(&mut self, logo: impl Into<String>) -> &mut Self {
        self.logo = Some(logo.into());
        self
    }

    /// Atom `rights`, RSS `copyright`.
    pub fn rights(&self) -> Option<&str> {
        self.rights.as_deref()
    }

    pub fn set_rights(&mut self, rights: impl Into<String>) -> &mut Self {
        self.rights = Some(rights.into());
        self
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> &mut Self {
        self.language = Some(language.into());
        self
    }

    pub fn docs(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    /// Sets or clears the RSS `docs` URL.
    pub fn set_docs(&mut self, docs: Option<&str>) -> &mut Self {
        self.docs = docs.map(str::to_string);
        self
    }

    pub fn webmaster(&self) -> Option<&str> {
        self.webmaster.as_deref()
    }

    pub fn set_webmaster(&mut self, webmaster: impl Into<String>) -> &mut Self {
        self.webmaster = Some(webmaster.into());
        self
    }

    pub fn managing_editor(&self) -> Option<&str> {
        self.managing_editor.as_deref()
    }

    pub fn set_managing_editor(&mut self, editor: impl Into<String>) -> &mut Self {
        self.managing_editor = Some(editor.into());
        self
    }

    pub fn generator(&self) -> Option<&Generator> {
        self.generator.as_ref()
    }

    /// Sets or clears the generator. Defaults to this crate.
    pub fn set_generator(&mut self, generator: Option<Generator>) -> &mut Self {
        self.generator = generator;
        self
    }

    /// RSS `ttl` in minutes.
    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn set_ttl(&mut self, minutes: u32) -> Result<&mut Self, ValidationError> {
        self.ttl = Some(check_positive("ttl", minutes)?);
        Ok(self)
    }

    /// Hours (0-23, GMT) during which aggregators may skip reading.
    pub fn skip_hours(&self) -> &BTreeSet<u8> {
        &self.skip_hours
    }

    pub fn set_skip_hours(
        &mut self,
        hours: impl IntoIterator<Item = u8>,
        replace: bool,
    ) -> Result<&mut Self, ValidationError> {
        let hours = hours
            .into_iter()
            .map(check_hour)
            .collect::<Result<Vec<_>, _>>()?;
        if replace {
            self.skip_hours.clear();
        }
        self.skip_hours.extend(hours);
        Ok(self)
    }

    /// Days during which aggregators may skip reading, Monday first.
    pub fn skip_days(&self) -> &[Weekday] {
        &self.skip_days
    }

    pub fn set_skip_days(&mut self, days: impl IntoIterator<Item = Weekday>, replace: bool) -> &mut Self {
        if replace {
            self.skip_days.clear();
        }
        for day in days {
            if !self.skip_days.contains(&day) {
                self.skip_days.push(day);
            }
        }
        self.skip_days.sort_by_key(|d| d.num_days_from_monday());
        self
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: Image) -> &mut Self {
        self.image = Some(image);
        self
    }

    pub fn cloud(&self) -> Option<&Cloud> {
        self.cloud.as_ref()
    }

    pub fn set_cloud(&mut self, cloud: Cloud) -> &mut Self {
        self.cloud = Some(cloud);
        self
    }

    pub fn text_input(&self) -> Option<&TextInput> {
        self.text_input.as_ref()
    }

    pub fn set_text_input(&mut self, text_input: TextInput) -> &mut Self {
        self.text_input = Some(text_input);
        self
    }

    /// PICS rating of the channel.
    pub fn rating(&self) -> Option<&str> {
        self.rating.as_deref()
    }

    pub fn set_rating(&mut self, rating: impl Into<String>) -> &mut Self {
        self.rating = Some(rating.into());
        self
    }

    // ------------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------------

    /// Appends a fresh entry with this feed's extensions and returns it.
    pub fn add_entry(&mut self) -> &mut Entry {
        self.push_entry(Entry::new())
    }

    /// Appends an existing entry, attaching this feed's extensions to it.
    pub fn push_entry(&mut self, mut entry: Entry) -> &mut Entry {
        self.attach_extensions(&mut entry);
        let index = self.entries.len();
        self.entries.push(entry);
        &mut self.entries[index]
    }

    /// Replaces all entries, keeping the given order.
    pub fn set_entries(&mut self, entries: impl IntoIterator<Item = Entry>) -> &[Entry] {
        self.entries.clear();
        for entry in entries {
            self.push_entry(entry);
        }
        &self.entries
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Mutable access to the entries; the sequence itself can only change
    /// through the add/remove operations.
    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry> {
        self.entries.get_mut(index)
    }

    /// Removes one entry, keeping the order of the rest.
    pub fn remove_entry<'a>(&mut self, which: impl Into<EntryRef<'a>>) -> Option<Entry> {
        let index = match which.into() {
            EntryRef::Index(index) => index,
            EntryRef::Id(id) => self.entries.iter().position(|e| e.id() == id)?,
            EntryRef::Entry(entry) => self.entries.iter().position(|e| e == entry)?,
        };
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    // ------------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------------

    /// Loads an extension on the feed, on every existing entry, and on every
    /// entry added later. Loading a name twice keeps the existing instances.
    pub fn load_extension(&mut self, name: &str) -> FeedResult<&mut Self> {
        let factory = registry::resolve(name)?;
        self.extensions.insert(name, factory.build(Scope::Feed));

        if !self.auto_extensions.iter().any(|(n, _)| n == name) {
            self.auto_extensions.push((name.to_string(), factory));
        }

        let mut attached = 0usize;
        for entry in &mut self.entries {
            if entry.extensions_mut().insert(name, factory.build(Scope::Entry)) {
                attached += 1;
            }
        }
        tracing::debug!(extension = name, attached, "Propagated extension to existing entries");
        Ok(self)
    }

    /// Names loaded for automatic attachment to new entries, in load order.
    pub fn auto_extensions(&self) -> impl Iterator<Item = &str> {
        self.auto_extensions.iter().map(|(n, _)| n.as_str())
    }

    pub fn extensions(&self) -> &ExtensionContainer {
        &self.extensions
    }

    pub fn extension<T: Extension>(&self, name: &str) -> Option<&T> {
        self.extensions.get_as(name)
    }

    pub fn extension_mut<T: Extension>(&mut self, name: &str) -> Option<&mut T> {
        self.extensions.get_as_mut(name)
    }

    fn attach_extensions(&self, entry: &mut Entry) {
        for (name, factory) in &self.auto_extensions {
            if !entry.extensions().contains(name) {
                entry
                    .extensions_mut()
                    .insert(name, factory.build(Scope::Entry));
            }
        }
    }
}
