use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/**
 * Nodes
 * =====
 * A scraped site is a tree of unknown depth. On the wire it is plain
 *  nested JSON: an object is a directory of named children, a string
 *  is a file and names the document it points at.
 *  - Leaf: a FileKey, the identity of one extracted document
 *  - Branch: path segment -> child node
 * Segment order carries no meaning, we keep them sorted so that
 *  walks and renders are deterministic.
 */

/// Opaque identifier of one extracted document, unique across all sites.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileKey(String);

impl FileKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for FileKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf(FileKey),
    Branch(BTreeMap<String, TreeNode>),
}

impl Default for TreeNode {
    fn default() -> Self {
        TreeNode::Branch(BTreeMap::new())
    }
}

impl TreeNode {
    pub fn leaf(key: impl Into<FileKey>) -> Self {
        TreeNode::Leaf(key.into())
    }

    pub fn branch<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, TreeNode)>,
        S: Into<String>,
    {
        TreeNode::Branch(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// The file key if this is a leaf
    pub fn file_key(&self) -> Option<&FileKey> {
        match self {
            TreeNode::Leaf(key) => Some(key),
            TreeNode::Branch(_) => None,
        }
    }

    /// Children of a branch, or `None` for a leaf
    pub fn children(&self) -> Option<&BTreeMap<String, TreeNode>> {
        match self {
            TreeNode::Leaf(_) => None,
            TreeNode::Branch(children) => Some(children),
        }
    }

    /// Follow a sequence of segments down from this node.
    pub fn get<'a, I>(&self, segments: I) -> Option<&TreeNode>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = self;
        for segment in segments {
            match current {
                TreeNode::Branch(children) => current = children.get(segment)?,
                TreeNode::Leaf(_) => return None,
            }
        }
        Some(current)
    }

    /// Every leaf below this node along with its /-joined path.
    pub fn leaves(&self) -> Vec<(String, &FileKey)> {
        let mut out = Vec::new();
        collect_leaves(self, String::new(), &mut out);
        out
    }

    /// Just the file keys of every leaf below this node.
    pub fn file_keys(&self) -> Vec<&FileKey> {
        self.leaves().into_iter().map(|(_, key)| key).collect()
    }

    pub fn contains_leaf(&self, key: &FileKey) -> bool {
        match self {
            TreeNode::Leaf(k) => k == key,
            TreeNode::Branch(children) => children.values().any(|c| c.contains_leaf(key)),
        }
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 1,
            TreeNode::Branch(children) => children.values().map(TreeNode::leaf_count).sum(),
        }
    }
}

fn collect_leaves<'a>(node: &'a TreeNode, path: String, out: &mut Vec<(String, &'a FileKey)>) {
    match node {
        TreeNode::Leaf(key) => out.push((path, key)),
        TreeNode::Branch(children) => {
            for (name, child) in children {
                let child_path = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{}/{}", path, name)
                };
                collect_leaves(child, child_path, out);
            }
        }
    }
}
