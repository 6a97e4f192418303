use std::collections::BTreeMap;

use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::TeamId;

use crate::api::client::{ApiError, ApiRequest};

/// `GET /teams/all`
#[derive(Debug, Clone, Default)]
pub struct AllTeamsRequest;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllTeamsResponse {
    #[serde(default)]
    pub team: TeamListing,
}

/// Servers answer either with a list of ids or with the full id -> team
/// table; only the ids are needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamListing {
    Ids(Vec<TeamId>),
    ById(BTreeMap<TeamId, serde_json::Value>),
}

impl Default for TeamListing {
    fn default() -> Self {
        TeamListing::Ids(Vec::new())
    }
}

impl TeamListing {
    pub fn into_ids(self) -> Vec<TeamId> {
        let mut ids = match self {
            TeamListing::Ids(ids) => ids,
            TeamListing::ById(table) => table.into_keys().collect(),
        };
        ids.sort();
        ids.dedup();
        ids
    }
}

impl ApiRequest for AllTeamsRequest {
    type Response = AllTeamsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/teams/all")?;
        Ok(client.get(full_url))
    }
}
