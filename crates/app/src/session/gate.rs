use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::store::{Credential, SessionStore};
use crate::api::auth::VerifyRequest;
use crate::api::client::{ApiClient, FailureKind};

/// Where the user should be sent next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    Workspace,
}

/// Proof that the credential passed verification. Protected operations
/// take one of these; the only way to get one is a successful gate.
#[derive(Debug, Clone)]
pub struct Authorized {
    credential: Credential,
    generation: u64,
    identity: Option<String>,
}

impl Authorized {
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Session generation the verification happened under
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Identity the server reported for the token, if any
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }
}

#[derive(Debug, Clone)]
pub enum GateState {
    /// Verification not resolved yet. Nothing may render.
    Pending,
    Authorized(Authorized),
    Redirect(Route),
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("session verification has not completed")]
    Pending,
    #[error("not signed in")]
    Unauthorized,
}

impl GateError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::Auth
    }
}

/// Gate in front of every protected view.
///
/// One gate is one activation: it issues at most one `GET /verify`, never
/// retries, and any outcome other than an explicit 2xx (4xx, 5xx, timeout,
/// transport error) clears the credential and redirects to sign-in.
#[derive(Debug)]
pub struct SessionGate {
    store: Arc<SessionStore>,
    client: ApiClient,
    state: Mutex<GateState>,
    activated: AtomicBool,
}

impl SessionGate {
    pub fn new(store: Arc<SessionStore>, client: ApiClient) -> Self {
        Self {
            store,
            client,
            state: Mutex::new(GateState::Pending),
            activated: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> GateState {
        self.state.lock().clone()
    }

    /// Resolve the gate. Later calls return the first outcome without
    /// going back to the network.
    pub async fn activate(&self) -> GateState {
        if self.activated.swap(true, Ordering::SeqCst) {
            return self.state();
        }

        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::debug!("no credential present, redirecting to sign-in");
                self.on_unauthorized();
                return self.state();
            }
            Err(e) => {
                tracing::warn!("failed to read credential: {}", e);
                self.on_unauthorized();
                return self.state();
            }
        };

        let generation = self.store.generation();
        match self.client.call_authed(VerifyRequest, &credential).await {
            Ok(response) if self.store.is_current(generation) => {
                tracing::info!(identity = ?response.email(), "session verified");
                *self.state.lock() = GateState::Authorized(Authorized {
                    credential,
                    generation,
                    identity: response.email().map(str::to_string),
                });
            }
            Ok(_) => {
                // signed out or in again while we were waiting; whoever did
                // that already set the state
                tracing::debug!("discarding verification for a previous session");
            }
            Err(e) if self.store.is_current(generation) => {
                tracing::warn!(kind = ?e.kind(), "session verification failed: {}", e);
                self.on_unauthorized();
            }
            Err(e) => {
                // the credential it was checking is gone; leave the new one alone
                tracing::debug!("discarding failed verification for a previous session: {}", e);
            }
        }
        self.state()
    }

    /// Start a new activation, e.g. after signing in again. The next
    /// [`SessionGate::activate`] verifies afresh.
    pub fn rearm(&self) {
        *self.state.lock() = GateState::Pending;
        self.activated.store(false, Ordering::SeqCst);
    }

    /// Clear the credential and send the user to sign-in.
    pub fn on_unauthorized(&self) -> Route {
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear credential: {}", e);
        }
        *self.state.lock() = GateState::Redirect(Route::SignIn);
        Route::SignIn
    }

    pub fn is_authorized(&self) -> bool {
        matches!(&*self.state.lock(), GateState::Authorized(auth) if self.store.is_current(auth.generation))
    }

    pub fn authorized(&self) -> Result<Authorized, GateError> {
        match &*self.state.lock() {
            GateState::Authorized(auth) if self.store.is_current(auth.generation) => Ok(auth.clone()),
            GateState::Pending => Err(GateError::Pending),
            _ => Err(GateError::Unauthorized),
        }
    }

    /// Render `view` only once the gate has authorized. While pending or
    /// after a redirect there is nothing to show.
    pub fn render<T>(&self, view: impl FnOnce(&Authorized) -> T) -> Option<T> {
        self.authorized().ok().map(|auth| view(&auth))
    }

    /// Where to send the user given the current state, `None` while pending.
    pub fn route(&self) -> Option<Route> {
        match &*self.state.lock() {
            GateState::Pending => None,
            GateState::Authorized(_) => Some(Route::Workspace),
            GateState::Redirect(route) => Some(*route),
        }
    }
}
