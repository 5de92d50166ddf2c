//! RSS 1.0 syndication module: update schedule hints for aggregators.

use std::str::FromStr;

use super::{Extension, ExtensionFactory, Fragment, Inert, Namespace};
use crate::error::ValidationError;
use crate::model::validate::{check_positive, IntoTimestamp, Timestamp};

pub const NAME: &str = "syndication";

const NAMESPACES: &[Namespace] = &[Namespace {
    prefix: "sy",
    uri: "http://purl.org/rss/1.0/modules/syndication/",
}];

pub fn factory() -> ExtensionFactory {
    ExtensionFactory::new(new_feed, new_entry)
}

fn new_feed() -> Box<dyn Extension> {
    Box::new(Syndication::default())
}

fn new_entry() -> Box<dyn Extension> {
    Box::new(Inert)
}

/// Period over which the channel is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl UpdatePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdatePeriod::Hourly => "hourly",
            UpdatePeriod::Daily => "daily",
            UpdatePeriod::Weekly => "weekly",
            UpdatePeriod::Monthly => "monthly",
            UpdatePeriod::Yearly => "yearly",
        }
    }
}

impl FromStr for UpdatePeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(UpdatePeriod::Hourly),
            "daily" => Ok(UpdatePeriod::Daily),
            "weekly" => Ok(UpdatePeriod::Weekly),
            "monthly" => Ok(UpdatePeriod::Monthly),
            "yearly" => Ok(UpdatePeriod::Yearly),
            other => Err(ValidationError::new(
                "update_period",
                format!("{other:?} is not one of hourly, daily, weekly, monthly, yearly"),
            )),
        }
    }
}

/// Feed-level syndication hints. Rendered in both formats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Syndication {
    pub update_period: Option<UpdatePeriod>,
    /// Number of updates per period.
    pub update_frequency: Option<u32>,
    pub update_base: Option<Timestamp>,
}

impl Syndication {
    pub fn set_update_frequency(&mut self, frequency: u32) -> Result<&mut Self, ValidationError> {
        self.update_frequency = Some(check_positive("update_frequency", frequency)?);
        Ok(self)
    }

    pub fn set_update_base(&mut self, base: impl IntoTimestamp) -> Result<&mut Self, ValidationError> {
        self.update_base = Some(base.into_timestamp("update_base")?);
        Ok(self)
    }

    fn fragment(&self) -> Option<Fragment> {
        let mut fragment = Fragment::new();
        fragment.push_text_opt("sy:updatePeriod", self.update_period.map(|p| p.as_str()));
        fragment.push_text_opt(
            "sy:updateFrequency",
            self.update_frequency.map(|f| f.to_string()),
        );
        fragment.push_text_opt(
            "sy:updateBase",
            self.update_base.map(|b| b.to_rfc3339()),
        );
        fragment.non_empty()
    }
}

impl Extension for Syndication {
    fn namespaces(&self) -> &'static [Namespace] {
        NAMESPACES
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(frequency) = self.update_frequency {
            check_positive("update_frequency", frequency)?;
        }
        Ok(())
    }

    fn rss_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }

    fn atom_fragment(&self) -> Option<Fragment> {
        self.fragment()
    }
}
