use std::time::Duration;

use reqwest::{header::HeaderMap, header::HeaderValue, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::ApiError;
use super::ApiRequest;
use crate::session::Credential;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        Self::with_timeout(remote, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(remote: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
        })
    }

    /// Issue an unauthenticated call.
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request_builder = request.build_request(&self.remote, &self.client)?;
        Self::execute(request_builder).await
    }

    /// Issue a call carrying `credential` as a bearer token.
    pub async fn call_authed<T: ApiRequest>(
        &self,
        request: T,
        credential: &Credential,
    ) -> Result<T::Response, ApiError> {
        let request_builder = request
            .build_request(&self.remote, &self.client)?
            .bearer_auth(credential.secret());
        Self::execute(request_builder).await
    }

    async fn execute<R: DeserializeOwned>(request_builder: RequestBuilder) -> Result<R, ApiError> {
        let response = request_builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            let body = if body.trim().is_empty() { "null" } else { body.as_str() };
            return Ok(serde_json::from_str(body)?);
        }

        tracing::debug!(%status, body = %body, "remote call failed");
        Err(classify_failure(status, body))
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }
}

/// Map a non-2xx response onto an [`ApiError`].
///
/// An explicit `error` (or `message`) field wins, so application errors are
/// shown verbatim whatever their status. Bare 401/422 answers come from the
/// token layer and mean the credential is no good.
fn classify_failure(status: StatusCode, body: String) -> ApiError {
    if let Some(message) = remote_message(&body) {
        return ApiError::Rejected { status, message };
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::UNPROCESSABLE_ENTITY {
        return ApiError::Unauthorized(status);
    }
    ApiError::HttpStatus(status, body)
}

fn remote_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|field| value.get(field).and_then(|v| v.as_str()))
        .map(str::to_string)
}
