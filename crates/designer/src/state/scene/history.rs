//! Undo/redo log over full scene snapshots

use shared::Scene;

use super::SceneState;

/// Default number of snapshots kept
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear snapshot log with a cursor.
///
/// `index` is `None` until the first commit, afterwards it always points at a
/// valid entry. Committing after an undo discards the redo branch.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Scene>,
    index: Option<usize>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: None,
            limit: limit.max(1),
        }
    }

    /// Store a snapshot after the cursor, dropping any redo branch
    pub fn commit(&mut self, scene: &Scene) {
        let keep = self.index.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(scene.clone());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = Some(self.entries.len() - 1);
    }

    /// Overwrite the current entry instead of adding a new one
    pub fn amend(&mut self, scene: &Scene) {
        match self.index {
            Some(i) => self.entries[i] = scene.clone(),
            None => self.commit(scene),
        }
    }

    /// Step back; returns the snapshot to restore
    pub fn undo(&mut self) -> Option<Scene> {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                Some(self.entries[i - 1].clone())
            }
            _ => None,
        }
    }

    /// Step forward; returns the snapshot to restore
    pub fn redo(&mut self) -> Option<Scene> {
        let next = self.index? + 1;
        let scene = self.entries.get(next)?.clone();
        self.index = Some(next);
        Some(scene)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl SceneState {
    /// Restore the previous snapshot
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(scene) => {
                tracing::debug!("Undo to history index {:?}", self.history.index());
                self.set_scene(scene);
                true
            }
            None => false,
        }
    }

    /// Restore the next snapshot
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(scene) => {
                tracing::debug!("Redo to history index {:?}", self.history.index());
                self.set_scene(scene);
                true
            }
            None => false,
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}
