//! Shared helpers for workspace integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;

use common::prelude::*;

/// Install a compact tracing subscriber once, honouring RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build a fragment from (path, file key, body) triples. Paths are
/// /-separated and create intermediate directories as needed.
pub fn fragment(entries: &[(&str, &str, &str)]) -> Fragment {
    let mut root = BTreeMap::new();
    let mut content = BTreeMap::new();
    for (path, key, body) in entries {
        insert_path(&mut root, path, key);
        content.insert(FileKey::from(*key), body.to_string());
    }
    Fragment::new(TreeNode::Branch(root), content)
}

fn insert_path(dir: &mut BTreeMap<String, TreeNode>, path: &str, key: &str) {
    match path.split_once('/') {
        None => {
            dir.insert(path.to_string(), TreeNode::leaf(key));
        }
        Some((head, rest)) => {
            let child = dir
                .entry(head.to_string())
                .or_insert_with(|| TreeNode::Branch(BTreeMap::new()));
            if let TreeNode::Branch(children) = child {
                insert_path(children, rest, key);
            }
        }
    }
}

/// Begin and complete a submission in one go.
pub fn scrape(ws: &mut Workspace, url: &str, fragment: Fragment) -> Option<MergeReport> {
    match ws.begin_submission(url).unwrap() {
        Submit::Ticket(ticket) => Some(ws.complete(ticket, fragment).unwrap()),
        Submit::Duplicate => None,
    }
}
