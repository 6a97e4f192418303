use clap::Args;

use super::login::{password_or_stdin, LoginError};

#[derive(Args, Debug, Clone)]
pub struct Signup {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password (read from stdin if omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Signup {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let password = password_or_stdin(&self.password).await?;
        let message = ctx.session.signup(&self.email, &password).await?;
        Ok(format!("{}\nRun 'sitepad login --email {}' to sign in", message, self.email.trim()))
    }
}
