use clap::Args;

use common::prelude::TeamId;

use sitepad::team::TeamError;

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Team ID to create; you become its admin
    pub team_id: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Create {
    type Error = TeamError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        let team = ctx
            .session
            .teams()
            .create(&auth, TeamId::from(self.team_id.as_str()))
            .await?;
        Ok(team.to_string())
    }
}
