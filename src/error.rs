use std::borrow::Cow;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// A field value violated one of its rules.
///
/// Raised by the setters for values that can be checked eagerly (dates,
/// enumerated values) and by the serializers for required fields, which are
/// only checked once a render is requested.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    /// Path of the offending field, e.g. `entry[2].id` or `feed.link.rel`.
    pub field: Cow<'static, str>,
    /// Human-readable description of the violated rule.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for the most common rule: a required field was left empty.
    pub fn missing(field: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field, "required field is missing")
    }

    /// Prefix the field path with its parent, e.g. `title` -> `entry[0].title`.
    pub(crate) fn within(mut self, parent: &str) -> Self {
        self.field = Cow::Owned(format!("{}.{}", parent, self.field));
        self
    }
}

/// Errors surfaced by feed construction and rendering.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A required field is missing or a value breaks its constraint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// `load_extension` was called with a name nobody registered.
    #[error("unknown extension: {0}")]
    UnknownExtension(String),

    /// The requested output encoding is not supported.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A character cannot be represented in the output encoding.
    #[error("character {ch:?} cannot be encoded as {encoding} inside a CDATA section")]
    Unencodable { ch: char, encoding: &'static str },

    /// The XML writer failed.
    #[error("XML write error: {0}")]
    Xml(String),

    /// Writing the rendered document to its destination failed.
    #[error("failed to write feed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;
