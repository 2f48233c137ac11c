//! Headless harness for programmatic scene manipulation.
//!
//! Drives the same application state a viewer would, without any window:
//! used by the command protocol, the CLI and the tests.

use std::collections::HashMap;

use shared::{DesignObject, ObjectId, ObjectPatch, Scene, ShapeKind, Vector3};

use crate::build::{MeshCache, ObjectMesh};
use crate::error::DesignResult;
use crate::export::export_stl_named;
use crate::share;
use crate::state::{AppSettings, AppState};
use crate::validation::MeshValidator;

/// Headless test harness: manages app state and the mesh cache
pub struct TestHarness {
    pub app: AppState,
    cache: MeshCache,
}

impl TestHarness {
    /// Create a new empty harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        Self {
            app: AppState::new(settings),
            cache: MeshCache::new(),
        }
    }

    /// Harness starting from an existing scene (seeded as the first snapshot)
    pub fn with_scene(settings: AppSettings, scene: Scene) -> Self {
        Self {
            app: AppState::with_scene(settings, scene),
            cache: MeshCache::new(),
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add an object of `kind` and return its ID
    pub fn add(&mut self, kind: ShapeKind) -> DesignResult<ObjectId> {
        self.app.add_object(kind)
    }

    /// Add an object and move it to `pos` in the same undo step
    pub fn add_at(&mut self, kind: ShapeKind, pos: [f64; 3]) -> DesignResult<ObjectId> {
        let id = self.add(kind)?;
        self.app.scene.update_property(&id, &ObjectPatch::position(pos.into()));
        self.app.scene.amend_snapshot();
        Ok(id)
    }

    /// Add a unit box at the world origin
    pub fn add_box(&mut self) -> DesignResult<ObjectId> {
        self.add_at(ShapeKind::Box, [0.0, 0.0, 0.0])
    }

    pub fn duplicate(&mut self, id: &str) -> DesignResult<Option<ObjectId>> {
        self.app.duplicate_object(id)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.app.delete_object(id)
    }

    /// Live edit, no history entry
    pub fn update(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        self.app.scene.update_property(id, patch)
    }

    /// Final edit of a gesture, recorded in history
    pub fn commit(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        self.app.scene.commit(id, patch)
    }

    /// Set scale and commit
    pub fn set_scale(&mut self, id: &str, scale: [f64; 3]) -> bool {
        self.commit(id, &ObjectPatch::scale(Vector3::from(scale)))
    }

    /// Undo the last operation
    pub fn undo(&mut self) -> bool {
        self.app.undo()
    }

    /// Redo the last undone operation
    pub fn redo(&mut self) -> bool {
        self.app.redo()
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.app.clear();
    }

    /// Load a scene (replaces current, undoable)
    pub fn load_scene(&mut self, scene: Scene) -> DesignResult<()> {
        self.app.import(scene)
    }

    /// Load a scene from JSON string
    pub fn load_scene_json(&mut self, json: &str) -> DesignResult<()> {
        let scene: Scene = serde_json::from_str(json)?;
        self.load_scene(scene)
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> DesignResult<String> {
        Ok(serde_json::to_string_pretty(&self.app.scene.scene)?)
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select(&mut self, id: &str) -> bool {
        self.app.selection.select(id, &self.app.scene.scene)
    }

    pub fn clear_selection(&mut self) {
        self.app.selection.clear();
    }

    pub fn selected(&self) -> Option<&ObjectId> {
        self.app.selection.primary()
    }

    // ── Export + sharing ──────────────────────────────────────

    /// Export the scene as ASCII STL using the configured solid name
    pub fn export_stl(&self) -> DesignResult<String> {
        export_stl_named(&self.app.scene.scene, &self.app.settings.export.solid_name)
    }

    pub fn share_code(&self) -> DesignResult<String> {
        share::encode(&self.app.scene.scene)
    }

    /// Replace the scene from a share code. On error nothing changes.
    pub fn import_share_code(&mut self, token: &str) -> DesignResult<()> {
        let scene = share::decode(token)?;
        tracing::info!("Imported {} objects from share code", scene.len());
        self.load_scene(scene)
    }

    // ── Build + inspection ────────────────────────────────────

    /// Build world meshes for the current scene version
    pub fn build(&mut self) -> &[ObjectMesh] {
        let version = self.app.scene.version();
        self.cache.refresh(&self.app.scene.scene, version)
    }

    /// Number of objects in the scene
    pub fn object_count(&self) -> usize {
        self.app.scene.len()
    }

    pub fn object(&self, id: &str) -> Option<&DesignObject> {
        self.app.scene.get(id)
    }

    /// Number of meshes after build
    pub fn mesh_count(&self) -> usize {
        self.cache.meshes().len()
    }

    /// Get the world mesh for an object ID
    pub fn mesh_of(&self, id: &str) -> Option<&ObjectMesh> {
        self.cache.mesh_of(id)
    }

    /// Create a validator for an object's mesh
    pub fn validate_mesh(&self, id: &str) -> Option<MeshValidator<'_>> {
        self.mesh_of(id).map(|m| MeshValidator::new(&m.mesh))
    }

    /// Get build errors
    pub fn errors(&self) -> &HashMap<ObjectId, String> {
        self.cache.errors()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.cache.rebuild_count()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
