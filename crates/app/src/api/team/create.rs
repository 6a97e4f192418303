use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::TeamId;

use crate::api::client::{ApiError, ApiRequest};
use crate::api::MessageResponse;

/// `POST /create_team`. The caller becomes admin and first member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub team_id: TeamId,
}

impl ApiRequest for CreateTeamRequest {
    type Response = MessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/create_team")?;
        Ok(client.post(full_url).json(&self))
    }
}
