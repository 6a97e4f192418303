use std::sync::Arc;

use futures::future::join_all;
use parking_lot::Mutex;

use common::prelude::{MergeReport, Submit, Workspace, WorkspaceError};

use crate::api::client::{ApiClient, ApiError, FailureKind};
use crate::api::scrape::{ScrapeRequest, ScrapeResponse};
use crate::session::{Authorized, GateError, SessionGate, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Fragment merged into the workspace
    Merged(MergeReport),
    /// Same URL already submitted or in flight; nothing was sent
    Duplicate,
    /// The response arrived after the session it belonged to ended
    Discarded,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error("scrape request failed: {0}")]
    Api(#[from] ApiError),
    #[error("scraper reported an error: {0}")]
    Scraper(String),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::Gate(e) => e.kind(),
            // a body that is not a site tree counts as a bad response, like ApiError::Decode
            ScrapeError::Workspace(WorkspaceError::Fragment(_)) => FailureKind::Network,
            ScrapeError::Workspace(_) => FailureKind::Validation,
            ScrapeError::Api(e) => e.kind(),
            ScrapeError::Scraper(_) => FailureKind::RemoteRejection,
        }
    }
}

/// Sends URLs to the scraper and feeds the results into the workspace.
///
/// The workspace lock is taken only around reserving and applying, never
/// across the request, so several scrapes can be in flight at once and
/// the rest of the session stays usable meanwhile.
#[derive(Debug)]
pub struct ScrapeClient {
    client: ApiClient,
    store: Arc<SessionStore>,
    gate: Arc<SessionGate>,
    workspace: Arc<Mutex<Workspace>>,
    error: Mutex<Option<String>>,
}

impl ScrapeClient {
    pub fn new(
        client: ApiClient,
        store: Arc<SessionStore>,
        gate: Arc<SessionGate>,
        workspace: Arc<Mutex<Workspace>>,
    ) -> Self {
        Self {
            client,
            store,
            gate,
            workspace,
            error: Mutex::new(None),
        }
    }

    /// The one user-visible error message, if the last failure left one.
    pub fn last_error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    pub fn clear_error(&self) {
        *self.error.lock() = None;
    }

    pub async fn submit(&self, auth: &Authorized, url: &str) -> Result<ScrapeOutcome, ScrapeError> {
        if !self.store.is_current(auth.generation()) {
            return Err(GateError::Unauthorized.into());
        }

        let submit = self.workspace.lock().begin_submission(url);
        let ticket = match submit {
            Ok(Submit::Ticket(ticket)) => ticket,
            Ok(Submit::Duplicate) => return Ok(ScrapeOutcome::Duplicate),
            Err(e) => {
                *self.error.lock() = Some(e.to_string());
                return Err(e.into());
            }
        };
        self.clear_error();

        tracing::info!(url = %ticket.url(), site = %ticket.site(), "scraping");
        let result = self
            .client
            .call(ScrapeRequest {
                url: ticket.url().to_string(),
            })
            .await;

        if !self.store.is_current(auth.generation()) {
            tracing::debug!(url = %ticket.url(), "session ended while scraping, discarding");
            self.workspace.lock().abandon(&ticket);
            return Ok(ScrapeOutcome::Discarded);
        }

        let failure = {
            let mut workspace = self.workspace.lock();
            match result {
                Ok(ScrapeResponse::Scraped(fragment)) => match workspace.complete(ticket.clone(), fragment) {
                    Ok(report) => return Ok(ScrapeOutcome::Merged(report)),
                    Err(WorkspaceError::StaleTicket(_)) => return Ok(ScrapeOutcome::Discarded),
                    Err(e) => ScrapeError::from(e),
                },
                Ok(ScrapeResponse::Failed { error }) => {
                    workspace.abandon(&ticket);
                    ScrapeError::Scraper(error)
                }
                Err(e) => {
                    workspace.abandon(&ticket);
                    ScrapeError::Api(e)
                }
            }
        };

        tracing::warn!(url = %ticket.url(), kind = ?failure.kind(), "scrape failed: {}", failure);
        if failure.kind() == FailureKind::Auth {
            self.gate.on_unauthorized();
        }
        *self.error.lock() = Some(format!(
            "Failed to scrape {}. Please try again.",
            ticket.url()
        ));
        Err(failure)
    }

    /// Submit several URLs at once. They complete independently and in
    /// any order; one failing does not affect the others.
    pub async fn submit_all<'a, I>(
        &self,
        auth: &Authorized,
        urls: I,
    ) -> Vec<(String, Result<ScrapeOutcome, ScrapeError>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pending = urls.into_iter().map(|url| async move {
            let outcome = self.submit(auth, url).await;
            (url.to_string(), outcome)
        });
        join_all(pending).await
    }
}
