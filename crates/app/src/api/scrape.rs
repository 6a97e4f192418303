use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Fragment;

use crate::api::client::{ApiError, ApiRequest};

/// `POST /scrape`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// The scraper reports its own failures with a 200 and an `error` field,
/// so both shapes are part of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeResponse {
    Failed { error: String },
    Scraped(Fragment),
}

impl ApiRequest for ScrapeRequest {
    type Response = ScrapeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/scrape")?;
        Ok(client.post(full_url).json(&self))
    }
}
