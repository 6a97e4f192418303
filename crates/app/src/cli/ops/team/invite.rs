use clap::Args;

use common::prelude::TeamId;

use sitepad::team::TeamError;

#[derive(Args, Debug, Clone)]
pub struct Invite {
    /// Team ID (you must be its admin)
    #[arg(long)]
    pub team_id: String,

    /// Email of the user to invite
    #[arg(long)]
    pub email: String,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Invite {
    type Error = TeamError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        let message = ctx
            .session
            .teams()
            .invite_to(&auth, TeamId::from(self.team_id.as_str()), &self.email)
            .await?;
        Ok(message)
    }
}
