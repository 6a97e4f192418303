use clap::Args;

use sitepad::team::TeamError;

#[derive(Args, Debug, Clone)]
pub struct List;

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = TeamError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        let ids = ctx.session.teams().list_available(&auth).await?;

        if ids.is_empty() {
            Ok("No teams available".to_string())
        } else {
            Ok(ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
