use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use sitepad::session::{Authorized, GateError, Session, SessionStore};
use sitepad::state::{AppState, StateError};
use sitepad::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to load state: {0}")]
    State(#[from] StateError),
    #[error("failed to create API client: {0}")]
    Api(#[from] ApiError),
}

#[derive(Clone)]
pub struct OpContext {
    /// Loaded state (config defaults when `init` was never run)
    pub state: AppState,
    /// Optional custom config path (defaults to ~/.sitepad)
    pub config_path: Option<PathBuf>,
    /// The one session this process runs
    pub session: Arc<Session>,
}

impl OpContext {
    /// Create context with an optional remote override and config path
    pub fn new(remote: Option<Url>, config_path: Option<PathBuf>) -> Result<Self, ContextError> {
        let state = AppState::load_or_default(config_path.clone())?;
        let store = Arc::new(SessionStore::new(&state.sitepad_dir));
        let session = Session::new(store, &state.config.session_config(remote))?;

        Ok(Self {
            state,
            config_path,
            session: Arc::new(session),
        })
    }

    /// Run the session gate. Protected ops call this before anything else.
    pub async fn authorize(&self) -> Result<Authorized, GateError> {
        self.session.open().await
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::cli::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::cli::op::Op>::Error),
            )*
        }

        #[async_trait::async_trait]
        impl $crate::cli::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            async fn execute(&self, ctx: &$crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx).await
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
