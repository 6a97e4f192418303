//! Client side of the remote API.
//!
//! Every remote call is a request type implementing [`client::ApiRequest`];
//! [`client::ApiClient`] sends it and decodes the answer.

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod client;
pub mod scrape;
pub mod team;

pub use client::{ApiClient, ApiError, ApiRequest, FailureKind};

/// The `{message}` body most mutating endpoints answer with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
