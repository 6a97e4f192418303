use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{FileKey, TreeNode};

/// The (tree, content) pair returned by one scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub file_tree: TreeNode,
    #[serde(default)]
    pub content: BTreeMap<FileKey, String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("fragment tree must be a directory, got a single file ({0})")]
    RootIsLeaf(FileKey),
}

impl Fragment {
    pub fn new(file_tree: TreeNode, content: BTreeMap<FileKey, String>) -> Self {
        Self { file_tree, content }
    }

    /// Reject fragments that cannot be installed under a site key.
    pub fn validate(&self) -> Result<(), FragmentError> {
        match &self.file_tree {
            TreeNode::Leaf(key) => Err(FragmentError::RootIsLeaf(key.clone())),
            TreeNode::Branch(_) => Ok(()),
        }
    }

    /// Leaves the tree names without shipping a body for.
    pub fn missing_content(&self) -> Vec<&FileKey> {
        self.file_tree
            .file_keys()
            .into_iter()
            .filter(|key| !self.content.contains_key(*key))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_scrape_body() {
        let fragment: Fragment = serde_json::from_str(
            r#"{"file_tree": {"index": "a/index"}, "content": {"a/index": "<p>A</p>"}}"#,
        )
        .unwrap();

        assert!(fragment.validate().is_ok());
        assert!(fragment.missing_content().is_empty());
        assert_eq!(fragment.content[&FileKey::from("a/index")], "<p>A</p>");
    }

    #[test]
    fn test_missing_content_and_leaf_root() {
        let fragment = Fragment::new(
            TreeNode::branch([("a", TreeNode::leaf("x")), ("b", TreeNode::leaf("y"))]),
            [(FileKey::from("x"), "x".to_string())].into_iter().collect(),
        );
        assert_eq!(fragment.missing_content(), vec![&FileKey::from("y")]);

        let leaf_root = Fragment::new(TreeNode::leaf("x"), BTreeMap::new());
        assert_eq!(
            leaf_root.validate(),
            Err(FragmentError::RootIsLeaf(FileKey::from("x")))
        );
    }
}
