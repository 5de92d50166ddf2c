//! Torrent metadata for items announcing a `.torrent` file. RSS only.

use super::{Extension, ExtensionFactory, Fragment, Inert, Namespace};
use crate::error::ValidationError;

pub const NAME: &str = "torrent";

const NAMESPACES: &[Namespace] = &[Namespace {
    prefix: "torrent",
    uri: "http://xmlns.ezrss.it/0.1/",
}];

pub fn factory() -> ExtensionFactory {
    ExtensionFactory::new(new_feed, new_entry)
}

fn new_feed() -> Box<dyn Extension> {
    Box::new(Inert)
}

fn new_entry() -> Box<dyn Extension> {
    Box::new(Torrent::default())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Torrent {
    pub filename: Option<String>,
    /// SHA-1 info hash, 40 hex characters.
    pub infohash: Option<String>,
    pub content_length: Option<u64>,
    pub seeds: Option<u32>,
    pub peers: Option<u32>,
    pub verified: Option<u32>,
}

impl Extension for Torrent {
    fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(hash) = &self.infohash {
            if hash.len() != 40 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ValidationError::new(
                    "infohash",
                    "must be 40 hexadecimal characters",
                ));
            }
        }
        Ok(())
    }

    fn rss_fragment(&self) -> Option<Fragment> {
        let mut fragment = Fragment::new();
        fragment.push_text_opt("torrent:filename", self.filename.as_deref());
        fragment.push_text_opt("torrent:infohash", self.infohash.as_deref());
        fragment.push_text_opt(
            "torrent:contentlength",
            self.content_length.map(|v| v.to_string()),
        );
        fragment.push_text_opt("torrent:seeds", self.seeds.map(|v| v.to_string()));
        fragment.push_text_opt("torrent:peers", self.peers.map(|v| v.to_string()));
        fragment.push_text_opt("torrent:verified", self.verified.map(|v| v.to_string()));
        fragment.non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infohash_validation() {
        let mut t = Torrent {
            infohash: Some("7661229811ef32014879ceedcdf4a48f256c88ba".into()),
            ..Default::default()
        };
        assert!(t.validate().is_ok());
        t.infohash = Some("not-a-hash".into());
        assert_eq!(t.validate().unwrap_err().field, "infohash");
    }

    #[test]
    fn test_no_atom_contribution() {
        let t = Torrent {
            seeds: Some(789),
            ..Default::default()
        };
        assert!(t.rss_fragment().is_some());
        assert!(t.atom_fragment().is_none());
    }
}
