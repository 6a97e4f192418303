//! Site trees
//!
//! Every scrape produces a nested structure for one site. The
//! [`TreeAggregator`] keeps one such subtree per [`SiteKey`]:
//!
//! ```text
//! root
//!  ├── a.example            (SiteKey)
//!  │    └── body
//!  │         ├── h1_3f2a…  -> FileKey
//!  │         └── p_91bc…   -> FileKey
//!  └── b.example
//!       └── index          -> FileKey
//! ```
//!
//! Re-scraping a site swaps its subtree out whole; nothing is deep-merged.

mod aggregate;
mod node;
mod site_key;

pub use aggregate::TreeAggregator;
pub use node::{FileKey, TreeNode};
pub use site_key::{SiteKey, SiteKeyError};
