pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "sitepad")]
#[command(about = "Scrape websites into an editable document workspace")]
#[command(version)]
pub struct Args {
    /// Remote API base URL (overrides `remote` in config.toml)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the sitepad config directory (defaults to ~/.sitepad)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
