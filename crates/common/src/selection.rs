use serde::{Deserialize, Serialize};

use crate::content::ContentStore;
use crate::tree::FileKey;

/// Which file, if any, is open for editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Selected(FileKey),
}

impl Selection {
    pub fn key(&self) -> Option<&FileKey> {
        match self {
            Selection::None => None,
            Selection::Selected(key) => Some(key),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Selection::Selected(_))
    }
}

/// Handle to the editing surface for one selection.
///
/// Every transition bumps the revision, so a surface handed out before a
/// transition is no longer accepted after it, even if the same key gets
/// selected again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSurface {
    key: FileKey,
    revision: u64,
}

impl EditSurface {
    pub fn key(&self) -> &FileKey {
        &self.key
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: Selection,
    revision: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Selection {
        &self.state
    }

    pub fn selected(&self) -> Option<&FileKey> {
        self.state.key()
    }

    /// The one transition: re-selecting the open file closes it, any
    /// other key opens that file.
    pub fn select(&mut self, key: FileKey) -> &Selection {
        let next = match &self.state {
            Selection::Selected(current) if *current == key => Selection::None,
            _ => Selection::Selected(key),
        };
        self.transition(next);
        &self.state
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        if self.state.is_selected() {
            self.transition(Selection::None);
        }
    }

    /// Clear the selection if `still_present` says its key is gone.
    pub fn retain(&mut self, still_present: impl Fn(&FileKey) -> bool) -> bool {
        match &self.state {
            Selection::Selected(key) if !still_present(key) => {
                tracing::debug!(file = %key, "selected file left the tree, clearing selection");
                self.transition(Selection::None);
                false
            }
            _ => true,
        }
    }

    /// The surface for the current selection, if any.
    pub fn surface(&self) -> Option<EditSurface> {
        self.state.key().map(|key| EditSurface {
            key: key.clone(),
            revision: self.revision,
        })
    }

    pub fn accepts(&self, surface: &EditSurface) -> bool {
        surface.revision == self.revision && self.state.key() == Some(&surface.key)
    }

    /// Route an edit for the current selection into `store`. Without a
    /// selection the write is dropped.
    pub fn write_current(&self, store: &mut ContentStore, body: impl Into<String>) -> bool {
        store.write(self.state.key(), body)
    }

    /// Route an edit coming from `surface`. Edits from a surface that
    /// predates the latest transition are dropped.
    pub fn write_from(
        &self,
        surface: &EditSurface,
        store: &mut ContentStore,
        body: impl Into<String>,
    ) -> bool {
        if !self.accepts(surface) {
            tracing::debug!(
                file = %surface.key,
                revision = surface.revision,
                current = self.revision,
                "dropping edit from stale surface"
            );
            return false;
        }
        store.write(Some(&surface.key), body)
    }

    fn transition(&mut self, next: Selection) {
        self.revision += 1;
        self.state = next;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_select_toggle() {
        let mut sel = SelectionController::new();
        let f = FileKey::from("f");

        assert_eq!(sel.select(f.clone()), &Selection::Selected(f.clone()));
        assert_eq!(sel.select(f), &Selection::None);
    }

    #[test]
    fn test_select_other_switches() {
        let mut sel = SelectionController::new();
        sel.select(FileKey::from("f"));
        sel.select(FileKey::from("g"));
        assert_eq!(sel.selected(), Some(&FileKey::from("g")));
    }

    #[test]
    fn test_stale_surface_rejected() {
        let mut sel = SelectionController::new();
        let mut store = ContentStore::new();

        sel.select(FileKey::from("a"));
        let surface_a = sel.surface().unwrap();
        sel.select(FileKey::from("b"));

        assert!(!sel.write_from(&surface_a, &mut store, "<p>meant for a</p>"));
        assert!(store.is_empty());

        let surface_b = sel.surface().unwrap();
        assert!(sel.write_from(&surface_b, &mut store, "<p>b</p>"));
        assert_eq!(store.read(&FileKey::from("b")), "<p>b</p>");
        assert_eq!(store.read(&FileKey::from("a")), "");
    }

    #[test]
    fn test_reselect_gets_fresh_surface() {
        let mut sel = SelectionController::new();
        let a = FileKey::from("a");

        sel.select(a.clone());
        let first = sel.surface().unwrap();
        sel.select(a.clone());
        sel.select(a);
        let second = sel.surface().unwrap();

        assert_ne!(first, second);
        assert!(!sel.accepts(&first));
        assert!(sel.accepts(&second));
    }

    #[test]
    fn test_write_current_without_selection() {
        let sel = SelectionController::new();
        let mut store = ContentStore::new();
        assert!(!sel.write_current(&mut store, "x"));
        assert!(store.is_empty());
        assert!(sel.surface().is_none());
    }

    #[test]
    fn test_retain() {
        let mut sel = SelectionController::new();
        sel.select(FileKey::from("gone"));
        assert!(!sel.retain(|_| false));
        assert_eq!(sel.state(), &Selection::None);
        assert!(sel.retain(|_| false));
    }
}
