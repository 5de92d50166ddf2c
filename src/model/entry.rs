use chrono::Utc;

use super::types::{Category, Content, Enclosure, Guid, Link, Person, Source, Text, TextType};
use super::validate::{check_positive, check_xhtml, FieldList, FieldUpdate, IntoTimestamp, Timestamp};
use crate::error::{FeedResult, ValidationError};
use crate::ext::{Extension, ExtensionContainer, Scope};

/// One item of a feed: an RSS `<item>` or an Atom `<entry>`.
///
/// Every entry is stamped with `updated = now` when constructed, so Atom
/// always has a timestamp to fall back on. Required fields are checked only
/// when the owning feed is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    id: String,
    title: Option<String>,
    updated: Option<Timestamp>,
    published: Option<Timestamp>,
    content: Option<Content>,
    summary: Option<Text>,
    description: Option<String>,
    links: FieldList<Link>,
    authors: FieldList<Person>,
    contributors: FieldList<Person>,
    categories: FieldList<Category>,
    rights: Option<String>,
    comments: Option<String>,
    source: Option<Source>,
    enclosure: Option<Enclosure>,
    ttl: Option<u32>,
    guid: Option<Guid>,
    extensions: ExtensionContainer,
}

impl Default for Entry {
    fn default() -> Self {
        Self::new()
    }
}

impl Entry {
    pub fn new() -> Self {
        Self {
            id: String::new(),
            title: None,
            updated: Some(Utc::now().fixed_offset()),
            published: None,
            content: None,
            summary: None,
            description: None,
            links: FieldList::default(),
            authors: FieldList::default(),
            contributors: FieldList::default(),
            categories: FieldList::default(),
            rights: None,
            comments: None,
            source: None,
            enclosure: None,
            ttl: None,
            guid: None,
            extensions: ExtensionContainer::new(Scope::Entry),
        }
    }

    // ------------------------------------------------------------------------
    // Identity and text
    // ------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Explicit RSS guid, if one was set.
    pub fn guid(&self) -> Option<&Guid> {
        self.guid.as_ref()
    }

    /// Sets the RSS guid. Also becomes the entry id when none is set yet.
    pub fn set_guid(&mut self, guid: impl Into<String>, is_permalink: bool) -> &mut Self {
        let guid = guid.into();
        if self.id.is_empty() {
            self.id = guid.clone();
        }
        self.guid = Some(Guid { guid, is_permalink });
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Sets the entry body. `xhtml` bodies must be well-formed.
    pub fn set_content(
        &mut self,
        body: impl Into<String>,
        kind: TextType,
    ) -> Result<&mut Self, ValidationError> {
        let body = body.into();
        if kind == TextType::Xhtml {
            check_xhtml("content", &body)?;
        }
        self.content = Some(Content {
            body: Text::new(body, kind),
            src: None,
            src_type: None,
        });
        Ok(self)
    }

    /// Points the Atom content at an out-of-line resource.
    pub fn set_content_src(&mut self, src: impl Into<String>, mime_type: Option<&str>) -> &mut Self {
        self.content = Some(Content {
            body: Text::default(),
            src: Some(src.into()),
            src_type: mime_type.map(str::to_string),
        });
        self
    }

    pub fn summary(&self) -> Option<&Text> {
        self.summary.as_ref()
    }

    pub fn set_summary(
        &mut self,
        summary: impl Into<String>,
        kind: TextType,
    ) -> Result<&mut Self, ValidationError> {
        let summary = summary.into();
        if kind == TextType::Xhtml {
            check_xhtml("summary", &summary)?;
        }
        self.summary = Some(Text::new(summary, kind));
        Ok(self)
    }

    /// RSS description. Falls back to the summary text when unset.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn rights(&self) -> Option<&str> {
        self.rights.as_deref()
    }

    pub fn set_rights(&mut self, rights: impl Into<String>) -> &mut Self {
        self.rights = Some(rights.into());
        self
    }

    /// URL of the comments page. RSS only.
    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn set_comments(&mut self, comments: impl Into<String>) -> &mut Self {
        self.comments = Some(comments.into());
        self
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

    /// Drops the creation stamp, e.g. for reproducible output.
    pub fn clear_updated(&mut self) -> &mut Self {
        self.updated = None;
        self
    }

    pub fn published(&self) -> Option<Timestamp> {
        self.published
    }

    pub fn set_published(
        &mut self,
        published: impl IntoTimestamp,
    ) -> Result<&mut Self, ValidationError> {
        self.published = Some(published.into_timestamp("published")?);
        Ok(self)
    }

    /// RSS name for [`Entry::published`].
    pub fn pub_date(&self) -> Option<Timestamp> {
        self.published
    }

    pub fn set_pub_date(&mut self, pub_date: impl IntoTimestamp) -> Result<&mut Self, ValidationError> {
        self.published = Some(pub_date.into_timestamp("pub_date")?);
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
    // Single structures
    // ------------------------------------------------------------------------

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn set_source(&mut self, url: impl Into<String>, title: impl Into<String>) -> &mut Self {
        self.source = Some(Source {
            url: url.into(),
            title: title.into(),
        });
        self
    }

    pub fn enclosure(&self) -> Option<&Enclosure> {
        self.enclosure.as_ref()
    }

    pub fn set_enclosure(&mut self, enclosure: Enclosure) -> &mut Self {
        self.enclosure = Some(enclosure);
        self
    }

    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    pub fn set_ttl(&mut self, minutes: u32) -> Result<&mut Self, ValidationError> {
        self.ttl = Some(check_positive("ttl", minutes)?);
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------------

    /// Loads an extension on this entry only.
    pub fn load_extension(&mut self, name: &str) -> FeedResult<&mut Self> {
        self.extensions.load(name)?;
        Ok(self)
    }

    pub fn extensions(&self) -> &ExtensionContainer {
        &self.extensions
    }

    pub(crate) fn extensions_mut(&mut self) -> &mut ExtensionContainer {
        &mut self.extensions
    }

    pub fn extension<T: Extension>(&self, name: &str) -> Option<&T> {
        self.extensions.get_as(name)
    }

    pub fn extension_mut<T: Extension>(&mut self, name: &str) -> Option<&mut T> {
        self.extensions.get_as_mut(name)
    }

    /// Publication time used for ordering: `published`, else `updated`.
    pub(crate) fn sort_key(&self) -> Option<Timestamp> {
        self.published.or(self.updated)
    }
}
