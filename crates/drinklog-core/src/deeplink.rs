//! Inbound `widget://stats/<N>` links.
//!
//! The widget opens the app on the day `N` days before today. `N` is the only
//! parameter; anything that is not a non-negative integer is rejected.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use url::Url;

use crate::day::day_offset_from;
use crate::error::DeepLinkError;

const SCHEME: &str = "widget";
const HOST: &str = "stats";

/// A request to show the day `offset` days before today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayLink {
    pub offset: u32,
}

impl DayLink {
    pub fn new(offset: u32) -> Self {
        Self { offset }
    }

    pub fn parse(input: &str) -> Result<Self, DeepLinkError> {
        let url = Url::parse(input.trim()).map_err(|_| DeepLinkError::InvalidUrl(input.to_string()))?;

        if url.scheme() != SCHEME {
            return Err(DeepLinkError::UnsupportedScheme(url.scheme().to_string()));
        }
        match url.host_str() {
            Some(HOST) => {}
            other => {
                return Err(DeepLinkError::UnsupportedHost(
                    other.unwrap_or_default().to_string(),
                ))
            }
        }

        // `widget://stats/1/` still means day 1.
        let last = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
            .unwrap_or_default();
        let offset = last
            .parse::<u32>()
            .map_err(|_| DeepLinkError::InvalidOffset(last.to_string()))?;

        Ok(Self { offset })
    }

    /// Day this link points at, counted back from `today`.
    pub fn resolve(&self, today: NaiveDate) -> NaiveDate {
        day_offset_from(today, self.offset)
    }

    pub fn to_url(&self) -> String {
        format!("{SCHEME}://{HOST}/{}", self.offset)
    }
}

impl fmt::Display for DayLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl FromStr for DayLink {
    type Err = DeepLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
