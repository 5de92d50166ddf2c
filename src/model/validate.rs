//! Per-field rules shared by [`Feed`](super::Feed) and [`Entry`](super::Entry).
//!
//! Values that can be checked in isolation (timestamps, enumerated values,
//! numeric ranges) are checked when they are set. Presence of required fields
//! is only checked at render time, so a feed can be filled in incrementally.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::ValidationError;

/// Internal timestamp representation. Always carries an offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Textual layouts accepted besides RFC 3339 and RFC 2822.
const EXTRA_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Parses a textual date into a [`Timestamp`].
///
/// A date without a UTC offset is rejected.
pub fn parse_date(field: &'static str, input: &str) -> Result<Timestamp, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::new(field, "date is empty"));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt);
    }
    for format in EXTRA_DATE_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }
    Err(ValidationError::new(
        field,
        format!("unrecognised date or missing timezone: {input:?}"),
    ))
}

/// Anything a date setter accepts.
pub trait IntoTimestamp {
    fn into_timestamp(self, field: &'static str) -> Result<Timestamp, ValidationError>;
}

impl IntoTimestamp for Timestamp {
    fn into_timestamp(self, _field: &'static str) -> Result<Timestamp, ValidationError> {
        Ok(self)
    }
}

impl IntoTimestamp for DateTime<Utc> {
    fn into_timestamp(self, _field: &'static str) -> Result<Timestamp, ValidationError> {
        Ok(self.fixed_offset())
    }
}

impl IntoTimestamp for &str {
    fn into_timestamp(self, field: &'static str) -> Result<Timestamp, ValidationError> {
        parse_date(field, self)
    }
}

impl IntoTimestamp for String {
    fn into_timestamp(self, field: &'static str) -> Result<Timestamp, ValidationError> {
        parse_date(field, &self)
    }
}

/// Fails with "required field is missing" when `value` is empty or blank.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::missing(field))
    } else {
        Ok(())
    }
}

/// Like [`require`], for optional values.
pub fn require_some<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ValidationError::missing(field)),
    }
}

/// RSS `skipHours` values are hours of the day, 0 through 23.
pub fn check_hour(hour: u8) -> Result<u8, ValidationError> {
    if hour < 24 {
        Ok(hour)
    } else {
        Err(ValidationError::new(
            "skip_hours",
            format!("hour {hour} is outside 0..=23"),
        ))
    }
}

/// RSS `ttl` and similar counters must be positive.
pub fn check_positive(field: &'static str, value: u32) -> Result<u32, ValidationError> {
    if value == 0 {
        Err(ValidationError::new(field, "must be greater than zero"))
    } else {
        Ok(value)
    }
}

/// Checks that an `xhtml` body is well-formed once wrapped in a `<div>`.
///
/// Text and attribute values may only use the five predefined entities and
/// numeric character references; the body is written out verbatim.
pub fn check_xhtml(field: &'static str, body: &str) -> Result<(), ValidationError> {
    use quick_xml::events::{BytesStart, Event};
    use quick_xml::Reader;

    let check_attributes = |start: &BytesStart<'_>| -> Result<(), ValidationError> {
        for attr in start.attributes() {
            let attr = attr.map_err(|e| malformed(field, e))?;
            attr.unescape_value().map_err(|e| malformed(field, e))?;
        }
        Ok(())
    };

    let wrapped = format!("<div>{body}</div>");
    let mut reader = Reader::from_str(&wrapped);
    let mut depth: usize = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                check_attributes(&start)?;
                depth += 1;
            }
            Ok(Event::Empty(start)) => check_attributes(&start)?,
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(text)) => {
                text.unescape().map_err(|e| malformed(field, e))?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(field, e)),
        }
    }
    if depth != 0 {
        return Err(ValidationError::new(field, "xhtml has unclosed elements"));
    }
    Ok(())
}

fn malformed(field: &'static str, e: impl std::fmt::Display) -> ValidationError {
    ValidationError::new(field, format!("xhtml is not well-formed: {e}"))
}

// ============================================================================
// Structured list fields
// ============================================================================

/// One call's worth of values for a structured list field (links, authors,
/// categories...), together with how they combine with what is already set.
#[derive(Debug, Clone)]
pub struct FieldUpdate<T> {
    pub values: Vec<T>,
    /// Clear the existing values before adding these.
    pub replace: bool,
    /// Remove only the existing values this matches before adding these.
    pub matching: Option<fn(&T) -> bool>,
}

impl<T> FieldUpdate<T> {
    /// Append a single value.
    pub fn one(value: T) -> Self {
        Self {
            values: vec![value],
            replace: false,
            matching: None,
        }
    }

    /// Append several values, keeping their order.
    pub fn append(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().collect(),
            replace: false,
            matching: None,
        }
    }

    /// Replace everything that was set before.
    pub fn replace(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().collect(),
            replace: true,
            matching: None,
        }
    }

    /// Replace only the existing values matching `pred`, e.g. swap the
    /// `self` link and keep the others.
    pub fn replace_where(values: impl IntoIterator<Item = T>, pred: fn(&T) -> bool) -> Self {
        Self {
            values: values.into_iter().collect(),
            replace: false,
            matching: Some(pred),
        }
    }
}

/// Ordered list of structured values with lookup and removal by predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList<T> {
    items: Vec<T>,
}

impl<T> Default for FieldList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> FieldList<T> {
    /// Applies an update and returns the resulting list.
    pub fn apply(&mut self, update: FieldUpdate<T>) -> &[T] {
        if update.replace {
            self.items.clear();
        } else if let Some(pred) = update.matching {
            self.items.retain(|item| !pred(item));
        }
        self.items.extend(update.values);
        &self.items
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// First value matching `pred`, e.g. the link whose rel is `self`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    /// Every value matching `pred`, in order.
    pub fn filter<'a>(&'a self, pred: impl Fn(&T) -> bool + 'a) -> impl Iterator<Item = &'a T> + 'a {
        self.items.iter().filter(move |item| pred(item))
    }

    /// Removes every value matching `pred`, returning how many were removed.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
}

impl<'a, T> IntoIterator for &'a FieldList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> std::ops::Index<usize> for FieldList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}
