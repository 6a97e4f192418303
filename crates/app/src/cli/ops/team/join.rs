use clap::Args;

use common::prelude::TeamId;

use sitepad::team::TeamError;

#[derive(Args, Debug, Clone)]
pub struct Join {
    /// Team ID to join, must be one `team list` offers
    pub team_id: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Join {
    type Error = TeamError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        let teams = ctx.session.teams();

        teams.list_available(&auth).await?;
        if let Some(team_id) = &self.team_id {
            teams.choose(TeamId::from(team_id.as_str()))?;
        }

        // without a pick this fails before any request goes out
        let team = teams.join(&auth).await?;
        Ok(team.to_string())
    }
}
