use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::SessionConfig;

pub const APP_NAME: &str = "sitepad";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_REMOTE: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the remote API (scraper, auth, teams)
    #[serde(default = "default_remote")]
    pub remote: Url,
    /// Default tracing level, RUST_LOG still takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for log files (optional, logs to stderr only if not set)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Timeout for scrape and team requests, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Timeout for session verification, in seconds
    #[serde(default = "default_verify_timeout_secs")]
    pub verify_timeout_secs: u64,
}

fn default_remote() -> Url {
    Url::parse(DEFAULT_REMOTE).expect("hardcoded URL must parse")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_verify_timeout_secs() -> u64 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            log_level: default_log_level(),
            log_dir: None,
            request_timeout_secs: default_request_timeout_secs(),
            verify_timeout_secs: default_verify_timeout_secs(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }

    /// Session settings, with `remote` overriding the configured URL
    pub fn session_config(&self, remote: Option<Url>) -> SessionConfig {
        SessionConfig {
            remote: remote.unwrap_or_else(|| self.remote.clone()),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            verify_timeout: Duration::from_secs(self.verify_timeout_secs),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the sitepad directory (~/.sitepad)
    pub sitepad_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the sitepad directory path (custom or default ~/.sitepad)
    pub fn sitepad_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new sitepad state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let sitepad_dir = Self::sitepad_dir(custom_path)?;
        let config_path = sitepad_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&sitepad_dir)?;

        let config = config.unwrap_or_default();
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            sitepad_dir,
            config_path,
            config,
        })
    }

    /// Load existing state from the sitepad directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let sitepad_dir = Self::sitepad_dir(custom_path)?;
        let config_path = sitepad_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::NotInitialized);
        }

        let config = read_config(&config_path)?;

        Ok(Self {
            sitepad_dir,
            config_path,
            config,
        })
    }

    /// Load state, falling back to defaults when `init` was never run.
    pub fn load_or_default(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let sitepad_dir = Self::sitepad_dir(custom_path)?;
        let config_path = sitepad_dir.join(CONFIG_FILE_NAME);

        let config = if config_path.exists() {
            read_config(&config_path)?
        } else {
            AppConfig::default()
        };

        Ok(Self {
            sitepad_dir,
            config_path,
            config,
        })
    }
}

fn read_config(path: &Path) -> Result<AppConfig, StateError> {
    let config_toml = fs::read_to_string(path)?;
    Ok(toml::from_str(&config_toml)?)
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("sitepad directory not initialized. Run 'sitepad init' first")]
    NotInitialized,

    #[error("sitepad directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let custom = Some(dir.path().join("state"));

        let config = AppConfig {
            remote: Url::parse("http://scraper.internal:8000").unwrap(),
            ..AppConfig::default()
        };
        AppState::init(custom.clone(), Some(config)).unwrap();
        assert!(matches!(
            AppState::init(custom.clone(), None),
            Err(StateError::AlreadyInitialized)
        ));

        let state = AppState::load(custom).unwrap();
        assert_eq!(state.config.remote.as_str(), "http://scraper.internal:8000/");
        assert_eq!(state.config.verify_timeout_secs, 10);
    }

    #[test]
    fn test_defaults_without_init() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(dir.path().to_path_buf())),
            Err(StateError::NotInitialized)
        ));

        let state = AppState::load_or_default(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(state.config.remote.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(state.config.log_level().unwrap(), tracing::Level::INFO);
    }

    #[test]
    fn test_partial_config_and_override() {
        let config: AppConfig = toml::from_str("log_level = \"debug\"").unwrap();
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);

        let remote = Url::parse("http://other:1").unwrap();
        let session = config.session_config(Some(remote.clone()));
        assert_eq!(session.remote, remote);
        assert_eq!(session.request_timeout, Duration::from_secs(30));

        let bad: AppConfig = toml::from_str("log_level = \"loud\"").unwrap();
        assert!(bad.log_level().is_err());
    }
}
