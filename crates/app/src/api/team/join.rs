use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::TeamId;

use crate::api::client::{ApiError, ApiRequest};
use crate::api::MessageResponse;

/// `POST /join_team`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTeamRequest {
    pub team_id: TeamId,
}

impl ApiRequest for JoinTeamRequest {
    type Response = MessageResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/join_team")?;
        Ok(client.post(full_url).json(&self))
    }
}
