use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::api::client::{ApiError, ApiRequest};

/// `GET /verify`. Any 2xx means the bearer token is good.
#[derive(Debug, Clone, Default)]
pub struct VerifyRequest;

/// Whatever the server chose to say about the token. Only the status
/// matters, the body is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerifyResponse(serde_json::Value);

impl VerifyResponse {
    /// Identity the token was issued to, if the server reports it
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(|v| v.as_str())
    }
}

impl ApiRequest for VerifyRequest {
    type Response = VerifyResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/verify")?;
        Ok(client.get(full_url))
    }
}
