// Library exports for the CLI and integration tests

pub mod api;
pub mod logging;
pub mod scrape;
pub mod session;
pub mod state;
pub mod team;

// Re-export key types for convenience
pub use api::{ApiClient, ApiError, FailureKind};
pub use scrape::{ScrapeClient, ScrapeError, ScrapeOutcome};
pub use session::{
    AuthError, Authorized, GateError, GateState, Route, Session, SessionConfig, SessionGate,
    SessionStore,
};
pub use state::{AppConfig, AppState, StateError};
pub use team::{TeamClient, TeamError, TeamView};
