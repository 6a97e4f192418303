use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Normalized origin host of a submitted URL. Each site owns the
/// top-level namespace under its key in the aggregated tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteKey(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SiteKeyError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("url has no host: {0}")]
    NoHost(String),
}

impl SiteKey {
    pub fn from_url(url: &Url) -> Result<Self, SiteKeyError> {
        // the url crate already lowercases and punycodes domain hosts
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| SiteKeyError::NoHost(url.to_string()))?;
        Ok(Self(host.trim_end_matches('.').to_ascii_lowercase()))
    }

    pub fn parse(raw: &str) -> Result<Self, SiteKeyError> {
        let url = Url::parse(raw.trim()).map_err(|e| SiteKeyError::InvalidUrl(e.to_string()))?;
        Self::from_url(&url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
