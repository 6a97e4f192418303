//! The active session.
//!
//! A [`Session`] wires the credential store, the gate, the workspace and
//! the scrape and team clients together. Everything it holds in memory
//! lives exactly as long as the session; only the credential is persisted.

mod gate;
mod store;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};
use url::Url;

use common::prelude::Workspace;

use crate::api::auth::{LoginRequest, SignupRequest};
use crate::api::client::{ApiClient, ApiError, FailureKind};
use crate::scrape::ScrapeClient;
use crate::team::TeamClient;

pub use gate::{Authorized, GateError, GateState, Route, SessionGate};
pub use store::{Credential, SessionStore, SessionStoreError, TOKEN_KEY};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

impl AuthError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AuthError::Validation(_) => FailureKind::Validation,
            AuthError::Api(e) => e.kind(),
            AuthError::Store(_) => FailureKind::Network,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the remote API
    pub remote: Url,
    /// Upper bound for scrape and team calls
    pub request_timeout: Duration,
    /// Upper bound for the gate's verification call
    pub verify_timeout: Duration,
}

#[derive(Debug)]
pub struct Session {
    store: Arc<SessionStore>,
    client: ApiClient,
    gate: Arc<SessionGate>,
    workspace: Arc<Mutex<Workspace>>,
    scrape: ScrapeClient,
    teams: TeamClient,
}

impl Session {
    pub fn new(store: Arc<SessionStore>, config: &SessionConfig) -> Result<Self, ApiError> {
        let client = ApiClient::with_timeout(&config.remote, config.request_timeout)?;
        let verify_client = ApiClient::with_timeout(&config.remote, config.verify_timeout)?;

        let gate = Arc::new(SessionGate::new(store.clone(), verify_client));
        let workspace = Arc::new(Mutex::new(Workspace::new()));
        let scrape = ScrapeClient::new(
            client.clone(),
            store.clone(),
            gate.clone(),
            workspace.clone(),
        );
        let teams = TeamClient::new(client.clone(), store.clone(), gate.clone());

        Ok(Self {
            store,
            client,
            gate,
            workspace,
            scrape,
            teams,
        })
    }

    /// Activate the gate. Only an explicit success yields an [`Authorized`].
    pub async fn open(&self) -> Result<Authorized, GateError> {
        match self.gate.activate().await {
            GateState::Authorized(auth) => Ok(auth),
            GateState::Pending => Err(GateError::Pending),
            GateState::Redirect(_) => Err(GateError::Unauthorized),
        }
    }

    pub fn authorized(&self) -> Result<Authorized, GateError> {
        self.gate.authorized()
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Client for calls that need no credential (sign-up, sign-in)
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn scrape(&self) -> &ScrapeClient {
        &self.scrape
    }

    pub fn teams(&self) -> &TeamClient {
        &self.teams
    }

    /// Lock the workspace. Do not hold the guard across an `.await`.
    pub fn workspace(&self) -> MutexGuard<'_, Workspace> {
        self.workspace.lock()
    }

    /// Register a new account. Does not sign in.
    pub async fn signup(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let (email, password) = credentials_input(email, password)?;
        let response = self.client.call(SignupRequest { email, password }).await?;
        Ok(response.message)
    }

    /// Exchange email and password for a token, persist it and re-arm
    /// the gate so the next [`Session::open`] verifies the new credential.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, AuthError> {
        let (email, password) = credentials_input(email, password)?;
        let response = self
            .client
            .call(LoginRequest {
                email: email.clone(),
                password,
            })
            .await?;

        // whatever the previous identity had in memory does not carry over
        self.workspace.lock().reset();
        self.teams.reset();
        self.scrape.clear_error();

        let credential = self.store.save(&response.token)?;
        self.gate.rearm();
        tracing::info!(email = %email, "signed in");
        Ok(credential)
    }

    /// Full reset: credential, tree, content, selection and team state.
    pub fn logout(&self) -> Result<Route, SessionStoreError> {
        self.store.clear()?;
        self.workspace.lock().reset();
        self.teams.reset();
        self.scrape.clear_error();
        Ok(self.gate.on_unauthorized())
    }
}

fn credentials_input(email: &str, password: &str) -> Result<(String, String), AuthError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok((email.to_string(), password.to_string()))
}
