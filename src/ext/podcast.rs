//! iTunes podcast tags. RSS only; Atom has no podcast directory semantics.

use std::str::FromStr;

use super::{Extension, ExtensionFactory, Fragment, Namespace};
use crate::error::ValidationError;
use crate::xml::XmlElement;

pub const NAME: &str = "podcast";

const NAMESPACES: &[Namespace] = &[Namespace {
    prefix: "itunes",
    uri: "http://www.itunes.com/dtds/podcast-1.0.dtd",
}];

pub fn factory() -> ExtensionFactory {
    ExtensionFactory::new(new_feed, new_entry)
}

fn new_feed() -> Box<dyn Extension> {
    Box::new(PodcastFeed::default())
}

fn new_entry() -> Box<dyn Extension> {
    Box::new(PodcastEntry::default())
}

/// `itunes:type` of the show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowType {
    Episodic,
    Serial,
}

impl FromStr for ShowType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "episodic" => Ok(ShowType::Episodic),
            "serial" => Ok(ShowType::Serial),
            other => Err(ValidationError::new(
                "itunes_type",
                format!("{other:?} is not one of episodic, serial"),
            )),
        }
    }
}

/// `itunes:episodeType` of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeType {
    Full,
    Trailer,
    Bonus,
}

impl FromStr for EpisodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(EpisodeType::Full),
            "trailer" => Ok(EpisodeType::Trailer),
            "bonus" => Ok(EpisodeType::Bonus),
            other => Err(ValidationError::new(
                "itunes_episode_type",
                format!("{other:?} is not one of full, trailer, bonus"),
            )),
        }
    }
}

/// A directory category, optionally with a subcategory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastCategory {
    pub category: String,
    pub subcategory: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn image_element(href: &str) -> XmlElement {
    XmlElement::new("itunes:image").attr("href", href)
}

fn check_image(field: &'static str, href: Option<&str>) -> Result<(), ValidationError> {
    match href {
        Some(href) if !(href.ends_with(".jpg") || href.ends_with(".png")) => Err(
            ValidationError::new(field, "image must be a .jpg or .png URL"),
        ),
        _ => Ok(()),
    }
}

/// Channel-level podcast settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodcastFeed {
    pub author: Option<String>,
    pub block: Option<bool>,
    pub categories: Vec<PodcastCategory>,
    pub image: Option<String>,
    pub explicit: Option<bool>,
    pub complete: Option<bool>,
    pub new_feed_url: Option<String>,
    pub owner: Option<Owner>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub show_type: Option<ShowType>,
}

impl PodcastFeed {
    pub fn add_category(&mut self, category: impl Into<String>, subcategory: Option<&str>) -> &mut Self {
        self.categories.push(PodcastCategory {
            category: category.into(),
            subcategory: subcategory.map(str::to_string),
        });
        self
    }
}

impl Extension for PodcastFeed {
    fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_image("itunes_image", self.image.as_deref())
    }

    fn rss_fragment(&self) -> Option<Fragment> {
        let mut fragment = Fragment::new();
        fragment.push_text_opt("itunes:author", self.author.as_deref());
        fragment.push_text_opt("itunes:block", self.block.map(yes_no));
        for cat in &self.categories {
            let mut el = XmlElement::new("itunes:category").attr("text", cat.category.as_str());
            if let Some(sub) = &cat.subcategory {
                el.push(XmlElement::new("itunes:category").attr("text", sub.as_str()));
            }
            fragment.push(el);
        }
        if let Some(href) = &self.image {
            fragment.push(image_element(href));
        }
        fragment.push_text_opt(
            "itunes:explicit",
            self.explicit.map(|e| if e { "true" } else { "false" }),
        );
        fragment.push_text_opt("itunes:complete", self.complete.map(yes_no));
        fragment.push_text_opt("itunes:new-feed-url", self.new_feed_url.as_deref());
        if let Some(owner) = &self.owner {
            fragment.push(
                XmlElement::new("itunes:owner")
                    .child(XmlElement::text_element("itunes:name", owner.name.as_str()))
                    .child(XmlElement::text_element("itunes:email", owner.email.as_str())),
            );
        }
        fragment.push_text_opt("itunes:subtitle", self.subtitle.as_deref());
        fragment.push_text_opt("itunes:summary", self.summary.as_deref());
        fragment.push_text_opt(
            "itunes:type",
            self.show_type.map(|t| match t {
                ShowType::Episodic => "episodic",
                ShowType::Serial => "serial",
            }),
        );
        fragment.non_empty()
    }
}

/// Episode-level podcast settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PodcastEntry {
    pub author: Option<String>,
    pub block: Option<bool>,
    pub image: Option<String>,
    /// Duration in seconds.
    pub duration: Option<u64>,
    pub explicit: Option<bool>,
    pub closed_captioned: Option<bool>,
    pub order: Option<u32>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub title: Option<String>,
    pub episode_type: Option<EpisodeType>,
}

/// `HH:MM:SS`, or `MM:SS` below one hour.
fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

impl Extension for PodcastEntry {
    fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    fn validate(&self) -> Result<(), ValidationError> {
        check_image("itunes_image", self.image.as_deref())
    }

    fn rss_fragment(&self) -> Option<Fragment> {
        let mut fragment = Fragment::new();
        fragment.push_text_opt("itunes:author", self.author.as_deref());
        fragment.push_text_opt("itunes:block", self.block.map(yes_no));
        if let Some(href) = &self.image {
            fragment.push(image_element(href));
        }
        fragment.push_text_opt("itunes:duration", self.duration.map(format_duration));
        fragment.push_text_opt(
            "itunes:explicit",
            self.explicit.map(|e| if e { "true" } else { "false" }),
        );
        fragment.push_text_opt("itunes:isClosedCaptioned", self.closed_captioned.map(yes_no));
        fragment.push_text_opt("itunes:order", self.order.map(|o| o.to_string()));
        fragment.push_text_opt("itunes:subtitle", self.subtitle.as_deref());
        fragment.push_text_opt("itunes:summary", self.summary.as_deref());
        fragment.push_text_opt("itunes:season", self.season.map(|s| s.to_string()));
        fragment.push_text_opt("itunes:episode", self.episode.map(|e| e.to_string()));
        fragment.push_text_opt("itunes:title", self.title.as_deref());
        fragment.push_text_opt(
            "itunes:episodeType",
            self.episode_type.map(|t| match t {
                EpisodeType::Full => "full",
                EpisodeType::Trailer => "trailer",
                EpisodeType::Bonus => "bonus",
            }),
        );
        fragment.non_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(61), "1:01");
        assert_eq!(format_duration(3723), "1:02:03");
    }

    #[test]
    fn test_nested_category() {
        let mut feed = PodcastFeed::default();
        feed.add_category("Technology", Some("Podcasting"));
        let fragment = feed.rss_fragment().unwrap();
        let category = &fragment.children[0];
        assert_eq!(category.attributes[0].1, "Technology");
        assert_eq!(category.elements().next().unwrap().attributes[0].1, "Podcasting");
    }

    #[test]
    fn test_image_extension_checked() {
        let entry = PodcastEntry {
            image: Some("https://example.com/cover.gif".into()),
            ..Default::default()
        };
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("serial".parse::<ShowType>().unwrap(), ShowType::Serial);
        assert!("weekly".parse::<EpisodeType>().is_err());
    }
}
