use clap::Args;

use sitepad::session::SessionStoreError;

#[derive(Args, Debug, Clone)]
pub struct Logout;

#[async_trait::async_trait]
impl crate::cli::op::Op for Logout {
    type Error = SessionStoreError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        ctx.session.logout()?;
        Ok("Signed out".to_string())
    }
}
