use std::path::PathBuf;

use clap::Args;
use url::Url;

use sitepad::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Remote API base URL to store in config.toml
    #[arg(long = "api-url")]
    pub api_url: Option<Url>,

    /// Default log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory for rotated log files (stderr only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            remote: self.api_url.clone().unwrap_or(defaults.remote.clone()),
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            ..defaults
        };
        config.log_level()?;

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let log_dir_str = match &state.config.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "stderr only".to_string(),
        };

        let output = format!(
            "Initialized sitepad directory at: {}\n\
             - Config: {}\n\
             - Remote: {}\n\
             - Log level: {}\n\
             - Log dir: {}",
            state.sitepad_dir.display(),
            state.config_path.display(),
            state.config.remote,
            state.config.log_level,
            log_dir_str
        );

        Ok(output)
    }
}
