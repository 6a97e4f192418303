use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::node::{FileKey, TreeNode};
use super::site_key::SiteKey;

/// The aggregated navigation tree: one subtree per scraped site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeAggregator {
    sites: BTreeMap<SiteKey, TreeNode>,
}

impl TreeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `tree` as the subtree for `site`, replacing whatever was
    /// there in full. Returns the replaced subtree, if any.
    pub fn merge(&mut self, site: SiteKey, tree: TreeNode) -> Option<TreeNode> {
        tracing::debug!(site = %site, leaves = tree.leaf_count(), "merging site tree");
        self.sites.insert(site, tree)
    }

    pub fn get(&self, site: &SiteKey) -> Option<&TreeNode> {
        self.sites.get(site)
    }

    pub fn sites(&self) -> impl Iterator<Item = &SiteKey> {
        self.sites.keys()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn contains_leaf(&self, key: &FileKey) -> bool {
        self.sites.values().any(|tree| tree.contains_leaf(key))
    }

    /// Every leaf in the aggregate, paths prefixed with their site key.
    pub fn leaves(&self) -> Vec<(String, &FileKey)> {
        self.sites
            .iter()
            .flat_map(|(site, tree)| {
                tree.leaves().into_iter().map(move |(path, key)| {
                    if path.is_empty() {
                        (site.to_string(), key)
                    } else {
                        (format!("{}/{}", site, path), key)
                    }
                })
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.sites.clear();
    }

    /// Plain-text outline of the aggregate.
    ///
    /// Branches whose /-joined path (site key first) is in `collapsed` are
    /// shown folded. Only leaves carry the selection marker.
    pub fn render(&self, collapsed: &HashSet<String>, selected: Option<&FileKey>) -> String {
        let mut out = String::new();
        if self.sites.is_empty() {
            out.push_str("No websites scraped yet\n");
            return out;
        }
        for (site, tree) in &self.sites {
            render_node(
                &mut out,
                site.as_str(),
                site.to_string(),
                tree,
                0,
                collapsed,
                selected,
            );
        }
        out
    }
}

fn render_node(
    out: &mut String,
    name: &str,
    path: String,
    node: &TreeNode,
    depth: usize,
    collapsed: &HashSet<String>,
    selected: Option<&FileKey>,
) {
    let indent = "  ".repeat(depth);
    match node {
        TreeNode::Leaf(key) => {
            let marker = if selected == Some(key) { '*' } else { ' ' };
            let _ = writeln!(out, "{}{}   {} ({})", indent, marker, name, key);
        }
        TreeNode::Branch(children) => {
            let folded = collapsed.contains(&path);
            let _ = writeln!(out, "{} [{}] {}", indent, if folded { '+' } else { '-' }, name);
            if folded {
                return;
            }
            for (child_name, child) in children {
                render_node(
                    out,
                    child_name,
                    format!("{}/{}", path, child_name),
                    child,
                    depth + 1,
                    collapsed,
                    selected,
                );
            }
        }
    }
}
