use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::FileKey;

/// Flat FileKey -> document body (serialized HTML) mapping.
///
/// The store never drops keys by itself; the only way keys go away is
/// [`ContentStore::clear`], which the workspace calls on a full reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentStore {
    bodies: BTreeMap<FileKey, String>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `content` into the store. Bodies already present for a key
    /// are overwritten, newest wins.
    pub fn absorb<I>(&mut self, content: I) -> usize
    where
        I: IntoIterator<Item = (FileKey, String)>,
    {
        let mut count = 0;
        for (key, body) in content {
            self.bodies.insert(key, body);
            count += 1;
        }
        count
    }

    /// Insert an empty body for `key` unless one is already present.
    pub fn ensure(&mut self, key: &FileKey) {
        if !self.bodies.contains_key(key) {
            self.bodies.insert(key.clone(), String::new());
        }
    }

    /// The body for `key`, or the empty string if there is none.
    pub fn read(&self, key: &FileKey) -> &str {
        self.bodies.get(key).map(String::as_str).unwrap_or("")
    }

    /// Replace the body for `key`. A write with no key is dropped: the
    /// editor can still emit updates after the selection went away.
    pub fn write(&mut self, key: Option<&FileKey>, body: impl Into<String>) -> bool {
        match key {
            Some(key) => {
                self.bodies.insert(key.clone(), body.into());
                true
            }
            None => {
                tracing::trace!("dropping content write with no target");
                false
            }
        }
    }

    pub fn contains(&self, key: &FileKey) -> bool {
        self.bodies.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &FileKey> {
        self.bodies.keys()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}
