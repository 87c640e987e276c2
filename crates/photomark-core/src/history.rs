//! Snapshot undo/redo history.

use crate::scene::SceneSnapshot;

/// A stack of full-scene snapshots and a cursor into it.
///
/// The cursor always points at a valid entry: the snapshot that matches the
/// scene as last committed or restored.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<SceneSnapshot>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(SceneSnapshot::default())
    }
}

impl History {
    /// Start a history whose only entry is `base`.
    pub fn new(base: SceneSnapshot) -> Self {
        Self {
            entries: vec![base],
            cursor: 0,
        }
    }

    /// Drop everything and start over from `base`.
    pub fn reset(&mut self, base: SceneSnapshot) {
        self.entries.clear();
        self.entries.push(base);
        self.cursor = 0;
    }

    /// Record a new state, discarding any redo branch.
    pub fn commit(&mut self, snapshot: SceneSnapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        self.cursor = self.entries.len() - 1;
        log::debug!("History commit, {} entries", self.entries.len());
    }

    /// Step back. Returns the snapshot to restore, or None at the bottom.
    pub fn undo(&mut self) -> Option<&SceneSnapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        log::debug!("History undo to {}", self.cursor);
        self.entries.get(self.cursor)
    }

    /// Step forward. Returns the snapshot to restore, or None at the top.
    pub fn redo(&mut self) -> Option<&SceneSnapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        log::debug!("History redo to {}", self.cursor);
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry the cursor points at.
    pub fn current(&self) -> Option<&SceneSnapshot> {
        self.entries.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
