use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{FeedError, FeedResult};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Output character encoding.
///
/// The document is always built as UTF-8 and transcoded at the end.
/// Characters the target cannot represent become numeric character
/// references where XML allows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// Label written into the XML declaration.
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Ascii => "US-ASCII",
            Encoding::Latin1 => "ISO-8859-1",
        }
    }

    fn max_code_point(&self) -> u32 {
        match self {
            Encoding::Utf8 => char::MAX as u32,
            Encoding::Ascii => 0x7F,
            Encoding::Latin1 => 0xFF,
        }
    }

    /// Transcodes a UTF-8 document.
    ///
    /// References are only written in character data and attribute values.
    /// An unrepresentable character in a name, a comment or a CDATA section
    /// fails with [`FeedError::Unencodable`].
    pub fn encode(&self, utf8: Vec<u8>) -> FeedResult<Vec<u8>> {
        if *self == Encoding::Utf8 {
            return Ok(utf8);
        }
        let text = String::from_utf8(utf8)
            .map_err(|e| FeedError::Xml(format!("writer produced invalid UTF-8: {e}")))?;
        let max = self.max_code_point();

        let mut out = Vec::with_capacity(text.len());
        let mut context = Context::Text;
        let mut rest = text.as_str();
        while let Some(ch) = rest.chars().next() {
            let delimiter = match context {
                Context::Text if rest.starts_with(CDATA_OPEN) => {
                    Some((CDATA_OPEN, Context::CData))
                }
                Context::Text if rest.starts_with(COMMENT_OPEN) => {
                    Some((COMMENT_OPEN, Context::Comment))
                }
                Context::CData if rest.starts_with(CDATA_CLOSE) => {
                    Some((CDATA_CLOSE, Context::Text))
                }
                Context::Comment if rest.starts_with(COMMENT_CLOSE) => {
                    Some((COMMENT_CLOSE, Context::Text))
                }
                _ => None,
            };
            if let Some((token, next)) = delimiter {
                out.extend_from_slice(token.as_bytes());
                rest = &rest[token.len()..];
                context = next;
                continue;
            }

            let code = ch as u32;
            if code <= max {
                // Fits in one byte for both single-byte targets
                out.push(code as u8);
            } else if context.allows_references() {
                out.extend_from_slice(format!("&#{code};").as_bytes());
            } else {
                return Err(FeedError::Unencodable {
                    ch,
                    encoding: self.label(),
                });
            }
            context = context.after(ch);
            rest = &rest[ch.len_utf8()..];
        }
        Ok(out)
    }
}

/// Where the transcoder is within the serialized markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    /// Inside `<...>`, outside attribute values.
    Markup,
    Quoted(char),
    CData,
    Comment,
}

impl Context {
    fn allows_references(self) -> bool {
        matches!(self, Context::Text | Context::Quoted(_))
    }

    fn after(self, ch: char) -> Self {
        match (self, ch) {
            (Context::Text, '<') => Context::Markup,
            (Context::Markup, '"' | '\'') => Context::Quoted(ch),
            (Context::Markup, '>') => Context::Text,
            (Context::Quoted(quote), c) if c == quote => Context::Markup,
            (context, _) => context,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Encoding {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "us-ascii" | "ascii" => Ok(Encoding::Ascii),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            _ => Err(FeedError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = FeedError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
