use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::TeamId;

use crate::api::client::{ApiError, ApiRequest};
use crate::api::MessageResponse;

/// `POST /invite`. Only the team admin may invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteRequest {
    pub team_id: TeamId,
    pub email: String,
}

impl ApiRequest for InviteRequest {
    type Response = MessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/invite")?;
        Ok(client.post(full_url).json(&self))
    }
}
