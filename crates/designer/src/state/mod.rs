pub mod chat;
pub mod scene;
pub mod selection;
pub mod settings;

use shared::{AiChatResponse, ObjectId, Scene, ShapeKind};

use crate::error::DesignResult;
use chat::ChatState;
pub use scene::SceneState;
use selection::SelectionState;
pub use settings::AppSettings;

/// Combined application state
pub struct AppState {
    pub scene: SceneState,
    pub selection: SelectionState,
    pub chat: ChatState,
    pub settings: AppSettings,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppSettings::load())
    }
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            scene: SceneState::with_history_limit(settings.history.limit),
            selection: SelectionState::default(),
            chat: ChatState::default(),
            settings,
        }
    }

    /// Start from a loaded scene
    pub fn with_scene(settings: AppSettings, scene: Scene) -> Self {
        Self {
            scene: SceneState::from_scene(scene, settings.history.limit),
            ..Self::new(settings)
        }
    }

    /// Add an object and select it
    pub fn add_object(&mut self, kind: ShapeKind) -> DesignResult<ObjectId> {
        let id = self.scene.add(kind)?;
        self.selection.select(&id, &self.scene.scene);
        Ok(id)
    }

    /// Duplicate an object and select the copy
    pub fn duplicate_object(&mut self, id: &str) -> DesignResult<Option<ObjectId>> {
        let copy = self.scene.duplicate(id)?;
        if let Some(copy_id) = &copy {
            self.selection.select(copy_id, &self.scene.scene);
        }
        Ok(copy)
    }

    /// Delete an object; clears the selection if it pointed there
    pub fn delete_object(&mut self, id: &str) -> bool {
        let removed = self.scene.delete(id);
        self.selection.retain_existing(&self.scene.scene);
        removed
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.scene.undo();
        self.selection.retain_existing(&self.scene.scene);
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.scene.redo();
        self.selection.retain_existing(&self.scene.scene);
        moved
    }

    pub fn clear(&mut self) {
        self.scene.clear();
        self.selection.clear();
    }

    /// Replace the scene (import from a share code or file)
    pub fn import(&mut self, scene: Scene) -> DesignResult<()> {
        self.scene.replace(scene)?;
        self.selection.retain_existing(&self.scene.scene);
        Ok(())
    }

    /// Apply an assistant reply or failure
    pub fn finish_chat(&mut self, result: DesignResult<AiChatResponse>) -> Vec<ObjectId> {
        self.chat.finish(result, &mut self.scene)
    }
}
