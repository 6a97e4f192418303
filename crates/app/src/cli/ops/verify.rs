use clap::Args;

use sitepad::session::GateError;

#[derive(Args, Debug, Clone)]
pub struct Verify;

#[async_trait::async_trait]
impl crate::cli::op::Op for Verify {
    type Error = GateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        Ok(match auth.identity() {
            Some(email) => format!("Session valid for {}", email),
            None => "Session valid".to_string(),
        })
    }
}
