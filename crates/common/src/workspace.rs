//! Workspace aggregate
//!
//! Owns the aggregated tree, the content store, the selection and the
//! ledger of submitted URLs. Scrape results are applied here and only
//! here, in one step, so a fragment is either fully visible or not at all.
//!
//! Submissions are two-phase. [`Workspace::begin_submission`] validates and
//! dedups the URL and hands back a [`SubmissionTicket`]; the network round
//! trip happens elsewhere; [`Workspace::complete`] or [`Workspace::abandon`]
//! closes the ticket. A reset in between invalidates every open ticket.

use std::collections::BTreeSet;

use url::Url;

use crate::content::ContentStore;
use crate::fragment::{Fragment, FragmentError};
use crate::selection::{EditSurface, Selection, SelectionController};
use crate::tree::{FileKey, SiteKey, SiteKeyError, TreeAggregator, TreeNode};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("invalid url '{0}': {1}")]
    InvalidUrl(String, String),
    #[error("unsupported url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error(transparent)]
    SiteKey(#[from] SiteKeyError),
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    #[error("submission for {0} is no longer current")]
    StaleTicket(String),
    #[error("not a file in the workspace: {0}")]
    NotAFile(FileKey),
}

/// Proof that a submission was started against the current workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    url: Url,
    site: SiteKey,
    epoch: u64,
}

impl SubmissionTicket {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn site(&self) -> &SiteKey {
        &self.site
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    Ticket(SubmissionTicket),
    /// Already submitted or in flight, nothing to do.
    Duplicate,
}

/// What a completed merge changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub site: SiteKey,
    pub url: Url,
    /// Leaves now under the site
    pub files: usize,
    /// Bodies the fragment shipped
    pub absorbed: usize,
    /// Leaves of the previous subtree that the new one no longer has
    pub dropped: Vec<FileKey>,
    /// Whether the replacement evicted the open file
    pub selection_cleared: bool,
}

#[derive(Debug, Default)]
pub struct Workspace {
    tree: TreeAggregator,
    content: ContentStore,
    selection: SelectionController,
    submitted: Vec<Url>,
    pending: BTreeSet<Url>,
    epoch: u64,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &TreeAggregator {
        &self.tree
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn selection(&self) -> &Selection {
        self.selection.state()
    }

    /// URLs whose scrape was merged, in submission order.
    pub fn submitted(&self) -> &[Url] {
        &self.submitted
    }

    pub fn pending(&self) -> impl Iterator<Item = &Url> {
        self.pending.iter()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Validate `raw` and reserve it. URLs are compared after parsing, so
    /// `http://a.example` and `http://a.example/` are one submission.
    pub fn begin_submission(&mut self, raw: &str) -> Result<Submit, WorkspaceError> {
        let raw = raw.trim();
        let url =
            Url::parse(raw).map_err(|e| WorkspaceError::InvalidUrl(raw.to_string(), e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(WorkspaceError::UnsupportedScheme(url.scheme().to_string()));
        }
        let site = SiteKey::from_url(&url)?;

        if self.submitted.contains(&url) || self.pending.contains(&url) {
            tracing::debug!(url = %url, "ignoring duplicate submission");
            return Ok(Submit::Duplicate);
        }

        self.pending.insert(url.clone());
        Ok(Submit::Ticket(SubmissionTicket {
            url,
            site,
            epoch: self.epoch,
        }))
    }

    /// Release a ticket whose scrape failed so the URL can be retried.
    pub fn abandon(&mut self, ticket: &SubmissionTicket) {
        if self.is_current(ticket) {
            self.pending.remove(&ticket.url);
        }
    }

    pub fn is_current(&self, ticket: &SubmissionTicket) -> bool {
        ticket.epoch == self.epoch && self.pending.contains(&ticket.url)
    }

    /// Apply a scraped fragment for `ticket`.
    ///
    /// Everything is checked before anything is touched. On error the
    /// workspace is exactly as it was (apart from releasing the ticket).
    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        fragment: Fragment,
    ) -> Result<MergeReport, WorkspaceError> {
        if !self.is_current(&ticket) {
            return Err(WorkspaceError::StaleTicket(ticket.url.to_string()));
        }
        if let Err(e) = fragment.validate() {
            self.pending.remove(&ticket.url);
            return Err(e.into());
        }

        let SubmissionTicket { url, site, .. } = ticket;
        let Fragment { file_tree, content } = fragment;

        let new_keys: BTreeSet<FileKey> = file_tree.file_keys().into_iter().cloned().collect();
        let files = file_tree.leaf_count();
        let absorbed = content.len();

        let replaced = self.tree.merge(site.clone(), file_tree);
        self.content.absorb(content);
        for key in &new_keys {
            self.content.ensure(key);
        }

        let dropped: Vec<FileKey> = replaced
            .as_ref()
            .map(TreeNode::file_keys)
            .unwrap_or_default()
            .into_iter()
            .filter(|key| !new_keys.contains(*key))
            .cloned()
            .collect();

        let tree = &self.tree;
        let selection_cleared = !self.selection.retain(|key| tree.contains_leaf(key));

        self.pending.remove(&url);
        self.submitted.push(url.clone());

        tracing::info!(
            site = %site,
            url = %url,
            files,
            absorbed,
            dropped = dropped.len(),
            "merged scrape fragment"
        );

        Ok(MergeReport {
            site,
            url,
            files,
            absorbed,
            dropped,
            selection_cleared,
        })
    }

    /// Toggle-select `key`. Only leaves of the current tree can be opened.
    pub fn select(&mut self, key: FileKey) -> Result<&Selection, WorkspaceError> {
        let reselecting = self.selection.selected() == Some(&key);
        if !reselecting && !self.tree.contains_leaf(&key) {
            return Err(WorkspaceError::NotAFile(key));
        }
        Ok(self.selection.select(key))
    }

    /// Select the file at a /-joined path such as `a.example/body/p_91bc`.
    pub fn select_path(&mut self, path: &str) -> Result<&Selection, WorkspaceError> {
        let key = self
            .tree
            .leaves()
            .into_iter()
            .find(|(p, _)| p == path)
            .map(|(_, key)| key.clone())
            .ok_or_else(|| WorkspaceError::NotAFile(FileKey::from(path)))?;
        self.select(key)
    }

    /// The open file's editing surface and the body to seed it with.
    pub fn open_document(&self) -> Option<(EditSurface, &str)> {
        let surface = self.selection.surface()?;
        let body = self.content.read(surface.key());
        Some((surface, body))
    }

    pub fn read(&self, key: &FileKey) -> &str {
        self.content.read(key)
    }

    /// Write `body` into the open file. Dropped when nothing is open.
    pub fn edit(&mut self, body: impl Into<String>) -> bool {
        self.selection.write_current(&mut self.content, body)
    }

    /// Write `body` coming from `surface`. Dropped if the surface is stale.
    pub fn edit_from(&mut self, surface: &EditSurface, body: impl Into<String>) -> bool {
        self.selection.write_from(surface, &mut self.content, body)
    }

    /// Leaves of the tree that have no content entry. Empty whenever no
    /// merge is half way through.
    pub fn orphaned_leaves(&self) -> Vec<FileKey> {
        self.tree
            .leaves()
            .into_iter()
            .filter(|(_, key)| !self.content.contains(key))
            .map(|(_, key)| key.clone())
            .collect()
    }

    /// Forget everything. Open tickets become stale.
    pub fn reset(&mut self) {
        tracing::info!(
            sites = self.tree.len(),
            files = self.content.len(),
            "resetting workspace"
        );
        self.tree.clear();
        self.content.clear();
        self.selection.clear();
        self.submitted.clear();
        self.pending.clear();
        self.epoch += 1;
    }
}
