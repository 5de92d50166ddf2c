use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// ============================================================================
// Links
// ============================================================================

/// Relation of a link to its feed or entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rel {
    #[default]
    Alternate,
    Related,
    SelfLink,
    Enclosure,
    Via,
}

impl Rel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rel::Alternate => "alternate",
            Rel::Related => "related",
            Rel::SelfLink => "self",
            Rel::Enclosure => "enclosure",
            Rel::Via => "via",
        }
    }
}

impl FromStr for Rel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternate" => Ok(Rel::Alternate),
            "related" => Ok(Rel::Related),
            "self" => Ok(Rel::SelfLink),
            "enclosure" => Ok(Rel::Enclosure),
            "via" => Ok(Rel::Via),
            other => Err(ValidationError::new(
                "link.rel",
                format!("{other:?} is not one of alternate, related, self, enclosure, via"),
            )),
        }
    }
}

impl fmt::Display for Rel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A link from a feed or entry to a related resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Link {
    pub href: String,
    pub rel: Rel,
    /// Media type of the target.
    pub mime_type: Option<String>,
    pub hreflang: Option<String>,
    pub title: Option<String>,
    /// Size of the target in bytes.
    pub length: Option<u64>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Default::default()
        }
    }

    pub fn with_rel(mut self, rel: Rel) -> Self {
        self.rel = rel;
        self
    }

    pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }
}

// ============================================================================
// People and categories
// ============================================================================

/// An author or contributor. `name` is required by Atom; RSS needs `email`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<String>,
    pub uri: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// RSS mailbox form: `email (name)`, or just the email.
    pub fn mailbox(&self) -> Option<String> {
        let email = self.email.as_deref()?;
        Some(match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{email} ({name})"),
            _ => email.to_string(),
        })
    }
}

/// A category. `scheme` becomes the RSS `domain`; `label` is Atom only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Category {
    pub term: String,
    pub scheme: Option<String>,
    pub label: Option<String>,
}

impl Category {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

// ============================================================================
// Text bodies
// ============================================================================

/// How a text body is escaped when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextType {
    /// Plain text, entity-escaped.
    #[default]
    Text,
    /// HTML markup carried as entity-escaped text.
    Html,
    /// Inline XHTML, embedded as markup.
    Xhtml,
    /// Wrapped verbatim in a CDATA section.
    Cdata,
}

impl TextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextType::Text => "text",
            TextType::Html => "html",
            TextType::Xhtml => "xhtml",
            TextType::Cdata => "CDATA",
        }
    }
}

impl FromStr for TextType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(TextType::Text),
            "html" => Ok(TextType::Html),
            "xhtml" => Ok(TextType::Xhtml),
            "CDATA" => Ok(TextType::Cdata),
            other => Err(ValidationError::new(
                "type",
                format!("{other:?} is not one of text, html, xhtml, CDATA"),
            )),
        }
    }
}

/// A text body with its escaping strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    pub value: String,
    pub kind: TextType,
}

impl Text {
    pub fn new(value: impl Into<String>, kind: TextType) -> Self {
        Self {
            value: value.into(),
            kind,
        }
    }

    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(value, TextType::Text)
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Text::plain(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Text::plain(value)
    }
}

/// Entry content. With `src` set, Atom references the body out of line
/// and `src_type` carries the MIME type of the referenced resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Content {
    pub body: Text,
    pub src: Option<String>,
    pub src_type: Option<String>,
}

// ============================================================================
// Entry-only structures
// ============================================================================

/// A media object attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
    pub length: u64,
}

impl Enclosure {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>, length: u64) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            length,
        }
    }
}

/// The channel an entry was republished from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub title: String,
}

/// RSS globally unique identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guid {
    pub guid: String,
    pub is_permalink: bool,
}

// ============================================================================
// Feed-only structures
// ============================================================================

/// Channel image. RSS requires title and link; they fall back to the
/// channel's own when unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    pub url: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// RSS cloud: a web service that supports the rssCloud interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloud {
    pub domain: String,
    pub port: u16,
    pub path: String,
    pub register_procedure: String,
    pub protocol: String,
}

/// RSS text input box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub title: String,
    pub description: String,
    pub name: String,
    pub link: String,
}

/// Software that produced the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub name: String,
    pub version: Option<String>,
    pub uri: Option<String>,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            uri: None,
        }
    }
}
