use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Team, TeamId};

use crate::api::client::{ApiError, ApiRequest};

/// `GET /team/:id`
#[derive(Debug, Clone)]
pub struct GetTeamRequest {
    pub team_id: TeamId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTeamResponse {
    pub team: Team,
}

impl ApiRequest for GetTeamRequest {
    type Response = GetTeamResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let mut full_url = base_url.join("/team")?;
        // push the id as one segment so it gets percent-encoded
        full_url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(self.team_id.as_str());
        Ok(client.get(full_url))
    }
}
