use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use sitepad::session::AuthError;

#[derive(Args, Debug, Clone)]
pub struct Login {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password (read from stdin if omitted)
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("failed to read password: {0}")]
    Input(#[from] std::io::Error),
}

/// Use `given` or read one line from stdin.
pub async fn password_or_stdin(given: &Option<String>) -> Result<String, std::io::Error> {
    if let Some(password) = given {
        return Ok(password.clone());
    }
    eprint!("Password: ");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let password = password_or_stdin(&self.password).await?;
        ctx.session.login(&self.email, &password).await?;
        Ok(format!("Signed in as {}", self.email.trim()))
    }
}
