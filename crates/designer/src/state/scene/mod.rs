//! Scene state management
//!
//! This module provides scene state with placed objects and undo/redo history.

mod history;
mod object_ops;
mod persistence;

pub use history::{History, DEFAULT_HISTORY_LIMIT};
pub use object_ops::{new_object_id, normalize_scene};
pub use persistence::{autosave_path, load_scene_file, project_dirs, save_scene_file};

use shared::{DesignObject, Scene};

/// Scene state with objects and undo/redo history
pub struct SceneState {
    /// Current scene (source of truth)
    pub scene: Scene,
    /// Snapshot log; seeded with the initial scene
    pub(crate) history: History,
    /// Monotonically increasing version counter for cache invalidation
    pub(crate) version: u64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl SceneState {
    /// Empty scene with a history log holding at most `limit` snapshots
    pub fn with_history_limit(limit: usize) -> Self {
        Self::from_scene(Scene::default(), limit)
    }

    /// Start from an existing scene; it becomes the first history entry
    pub fn from_scene(mut scene: Scene, limit: usize) -> Self {
        normalize_scene(&mut scene);
        let mut history = History::with_limit(limit);
        history.commit(&scene);
        Self {
            scene,
            history,
            version: 0,
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Get an object by ID
    pub fn get(&self, id: &str) -> Option<&DesignObject> {
        self.scene.get(id)
    }

    pub fn len(&self) -> usize {
        self.scene.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scene.is_empty()
    }

    /// Snapshot the current scene into history
    pub(crate) fn save_snapshot(&mut self) {
        self.history.commit(&self.scene);
    }

    /// Fold the current scene into the latest snapshot
    pub fn amend_snapshot(&mut self) {
        self.history.amend(&self.scene);
    }

    /// Swap in a whole scene without touching history
    pub(crate) fn set_scene(&mut self, scene: Scene) {
        self.scene = scene;
        self.version += 1;
    }
}
