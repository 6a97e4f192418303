use std::sync::Arc;

use parking_lot::Mutex;

use common::prelude::{Team, TeamId};

use crate::api::client::{ApiClient, ApiError, FailureKind};
use crate::api::team::{
    AllTeamsRequest, CreateTeamRequest, GetTeamRequest, InviteRequest, JoinTeamRequest,
};
use crate::session::{Authorized, GateError, SessionGate, SessionStore};

pub const NO_TEAM_SELECTED: &str = "Please select a team to join.";

#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("session changed while the team request was in flight")]
    Discarded,
}

impl TeamError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TeamError::Gate(e) => e.kind(),
            TeamError::Validation(_) => FailureKind::Validation,
            TeamError::Api(e) => e.kind(),
            TeamError::Discarded => FailureKind::Auth,
        }
    }
}

/// What the team area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamView {
    /// No team yet: offer create and join
    EntryPoints,
    /// A team is installed; create/join are gone for the rest of the session
    Details(Team),
}

#[derive(Debug, Default)]
struct TeamState {
    snapshot: Option<Team>,
    // Some while the join dialog is open
    available: Option<Vec<TeamId>>,
    selected: Option<TeamId>,
    message: Option<String>,
}

/// Client side of the single-team membership model.
#[derive(Debug)]
pub struct TeamClient {
    client: ApiClient,
    store: Arc<SessionStore>,
    gate: Arc<SessionGate>,
    state: Mutex<TeamState>,
}

impl TeamClient {
    pub fn new(client: ApiClient, store: Arc<SessionStore>, gate: Arc<SessionGate>) -> Self {
        Self {
            client,
            store,
            gate,
            state: Mutex::new(TeamState::default()),
        }
    }

    pub fn view(&self) -> TeamView {
        match &self.state.lock().snapshot {
            Some(team) => TeamView::Details(team.clone()),
            None => TeamView::EntryPoints,
        }
    }

    pub fn snapshot(&self) -> Option<Team> {
        self.state.lock().snapshot.clone()
    }

    /// Last user-facing message from a team operation
    pub fn message(&self) -> Option<String> {
        self.state.lock().message.clone()
    }

    /// Ids offered by the open join dialog, `None` when it is closed
    pub fn available(&self) -> Option<Vec<TeamId>> {
        self.state.lock().available.clone()
    }

    pub fn selected(&self) -> Option<TeamId> {
        self.state.lock().selected.clone()
    }

    /// Create `team_id` and install it as the current team.
    pub async fn create(&self, auth: &Authorized, team_id: TeamId) -> Result<Team, TeamError> {
        self.ensure_current(auth)?;
        if team_id.is_blank() {
            let error = TeamError::Validation("Team ID is required".to_string());
            return Err(self.fail(auth, error));
        }

        tracing::info!(team = %team_id, "creating team");
        let response = self
            .client
            .call_authed(
                CreateTeamRequest {
                    team_id: team_id.clone(),
                },
                auth.credential(),
            )
            .await
            .map_err(|e| self.fail(auth, e.into()))?;
        self.ensure_current(auth).map_err(|_| TeamError::Discarded)?;
        self.state.lock().message = Some(response.message);

        self.install(auth, team_id).await
    }

    /// Open the join dialog: fetch the ids the user may join. An empty
    /// list is a normal answer.
    pub async fn list_available(&self, auth: &Authorized) -> Result<Vec<TeamId>, TeamError> {
        self.ensure_current(auth)?;
        let response = self
            .client
            .call_authed(AllTeamsRequest, auth.credential())
            .await
            .map_err(|e| self.fail(auth, e.into()))?;
        self.ensure_current(auth).map_err(|_| TeamError::Discarded)?;

        let ids = response.team.into_ids();
        tracing::debug!(count = ids.len(), "fetched available teams");
        let mut state = self.state.lock();
        state.available = Some(ids.clone());
        state.selected = None;
        Ok(ids)
    }

    /// Pick a team from the open join dialog.
    pub fn choose(&self, team_id: TeamId) -> Result<(), TeamError> {
        let mut state = self.state.lock();
        let offered = state
            .available
            .as_ref()
            .map(|ids| ids.contains(&team_id))
            .unwrap_or(false);
        if !offered {
            let message = format!("Team {} is not in the list of available teams.", team_id);
            state.message = Some(message.clone());
            return Err(TeamError::Validation(message));
        }
        state.selected = Some(team_id);
        Ok(())
    }

    /// Close the join dialog without joining.
    pub fn dismiss(&self) {
        let mut state = self.state.lock();
        state.available = None;
        state.selected = None;
    }

    /// Join the team picked with [`TeamClient::choose`]. Without a pick
    /// this fails locally and sends nothing.
    pub async fn join(&self, auth: &Authorized) -> Result<Team, TeamError> {
        self.ensure_current(auth)?;
        let team_id = match self.selected() {
            Some(team_id) => team_id,
            None => {
                let error = TeamError::Validation(NO_TEAM_SELECTED.to_string());
                return Err(self.fail(auth, error));
            }
        };

        tracing::info!(team = %team_id, "joining team");
        let response = self
            .client
            .call_authed(
                JoinTeamRequest {
                    team_id: team_id.clone(),
                },
                auth.credential(),
            )
            .await
            .map_err(|e| self.fail(auth, e.into()))?;
        self.ensure_current(auth).map_err(|_| TeamError::Discarded)?;
        {
            let mut state = self.state.lock();
            state.message = Some(response.message);
            state.available = None;
            state.selected = None;
        }

        self.install(auth, team_id).await
    }

    /// Invite `email` into the current team. Admin only, enforced remotely.
    pub async fn invite(&self, auth: &Authorized, email: &str) -> Result<Team, TeamError> {
        self.ensure_current(auth)?;
        let team_id = match self.snapshot() {
            Some(team) => team.id,
            None => {
                return Err(self.fail(auth, TeamError::Validation(
                    "Create or join a team first.".to_string(),
                )))
            }
        };
        self.invite_to(auth, team_id.clone(), email).await?;
        self.install(auth, team_id).await
    }

    /// Invite `email` into `team_id` without touching the snapshot.
    pub async fn invite_to(
        &self,
        auth: &Authorized,
        team_id: TeamId,
        email: &str,
    ) -> Result<String, TeamError> {
        self.ensure_current(auth)?;
        if email.trim().is_empty() {
            let error = TeamError::Validation("Email is required".to_string());
            return Err(self.fail(auth, error));
        }

        tracing::info!(team = %team_id, "inviting member");
        let response = self
            .client
            .call_authed(
                InviteRequest {
                    team_id,
                    email: email.trim().to_string(),
                },
                auth.credential(),
            )
            .await
            .map_err(|e| self.fail(auth, e.into()))?;
        self.ensure_current(auth).map_err(|_| TeamError::Discarded)?;
        self.state.lock().message = Some(response.message.clone());
        Ok(response.message)
    }

    /// Fetch a team's details without touching the local snapshot.
    pub async fn details(&self, auth: &Authorized, team_id: TeamId) -> Result<Team, TeamError> {
        self.ensure_current(auth)?;
        let response = self
            .client
            .call_authed(GetTeamRequest { team_id }, auth.credential())
            .await
            .map_err(|e| self.fail(auth, e.into()))?;
        Ok(response.team)
    }

    /// Re-fetch the installed team.
    pub async fn refresh(&self, auth: &Authorized) -> Result<Option<Team>, TeamError> {
        match self.snapshot() {
            Some(team) => self.install(auth, team.id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Drop the snapshot and any dialog state.
    pub fn reset(&self) {
        *self.state.lock() = TeamState::default();
    }

    /// Fetch `team_id` and make it the one held snapshot, replacing any
    /// previous one whole.
    async fn install(&self, auth: &Authorized, team_id: TeamId) -> Result<Team, TeamError> {
        let team = self.details(auth, team_id).await?;
        if self.ensure_current(auth).is_err() {
            tracing::debug!(team = %team.id, "session changed, not installing team");
            return Err(TeamError::Discarded);
        }
        tracing::info!(team = %team.id, members = team.members.len(), "installed team snapshot");
        self.state.lock().snapshot = Some(team.clone());
        Ok(team)
    }

    fn ensure_current(&self, auth: &Authorized) -> Result<(), GateError> {
        if self.store.is_current(auth.generation()) {
            Ok(())
        } else {
            Err(GateError::Unauthorized)
        }
    }

    /// Record the user-facing message for `error` and hand it back. A
    /// failure from a session that has since ended touches nothing.
    fn fail(&self, auth: &Authorized, error: TeamError) -> TeamError {
        if !self.store.is_current(auth.generation()) {
            tracing::debug!("discarding team failure for a previous session: {}", error);
            return TeamError::Discarded;
        }
        tracing::warn!(kind = ?error.kind(), "team operation failed: {}", error);
        if error.kind() == FailureKind::Auth {
            self.gate.on_unauthorized();
        }
        let message = match &error {
            TeamError::Api(e) if e.kind() == FailureKind::Network => {
                "An error occurred while talking to the team service.".to_string()
            }
            other => other.to_string(),
        };
        self.state.lock().message = Some(message);
        error
    }
}
