#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::ApiClient;
pub use error::{ApiError, FailureKind};

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// One call against the remote API. Each request type knows its own
/// route, method and body; the client handles auth and response decoding.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}
