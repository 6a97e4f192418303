/**
 * Flat mapping from file identity to editable
 *  document body.
 */
pub mod content;
/**
 * Wire shape of a single scrape result: a nested
 *  tree plus the content for its leaves.
 */
pub mod fragment;
/**
 * Single-file selection state machine and the
 *  editing surface it hands out.
 */
pub mod selection;
/**
 * Local snapshot of the one team the user
 *  belongs to.
 */
pub mod team;
/**
 * Recursive site trees and the aggregator that
 *  keys them by site origin.
 */
pub mod tree;
/**
 * The aggregate tying tree, content and selection
 *  together. All fragment application goes through it.
 */
pub mod workspace;

pub mod prelude {
    pub use crate::content::ContentStore;
    pub use crate::fragment::{Fragment, FragmentError};
    pub use crate::selection::{EditSurface, Selection, SelectionController};
    pub use crate::team::{Team, TeamId};
    pub use crate::tree::{FileKey, SiteKey, SiteKeyError, TreeAggregator, TreeNode};
    pub use crate::workspace::{
        MergeReport, SubmissionTicket, Submit, Workspace, WorkspaceError,
    };
}
