use std::collections::HashSet;

use clap::Args;

use sitepad::scrape::ScrapeOutcome;
use sitepad::session::GateError;

#[derive(Args, Debug, Clone)]
pub struct Scrape {
    /// Website URLs to scrape; all are sent concurrently
    #[arg(required = true)]
    pub urls: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeOpError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("{0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Scrape {
    type Error = ScrapeOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let auth = ctx.authorize().await?;
        let results = ctx
            .session
            .scrape()
            .submit_all(&auth, self.urls.iter().map(String::as_str))
            .await;

        let mut lines = Vec::new();
        let mut merged = 0;
        for (url, result) in results {
            match result {
                Ok(ScrapeOutcome::Merged(report)) => {
                    merged += 1;
                    lines.push(format!(
                        "{} -> {} ({} files)",
                        report.url, report.site, report.files
                    ));
                }
                Ok(ScrapeOutcome::Duplicate) => lines.push(format!("{} (already submitted)", url)),
                Ok(ScrapeOutcome::Discarded) => lines.push(format!("{} (discarded)", url)),
                Err(e) => lines.push(format!("{} failed: {}", url, e)),
            }
        }

        if merged == 0 {
            let message = ctx
                .session
                .scrape()
                .last_error()
                .unwrap_or_else(|| lines.join("\n"));
            return Err(ScrapeOpError::Failed(message));
        }

        let tree = ctx.session.workspace().tree().render(&HashSet::new(), None);
        lines.push(String::new());
        lines.push(tree.trim_end().to_string());
        Ok(lines.join("\n"))
    }
}
