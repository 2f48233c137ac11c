//! Autosave and scene files

use std::path::{Path, PathBuf};

use shared::Scene;

use super::{normalize_scene, SceneState};
use crate::error::DesignResult;

/// Project directories shared by settings and autosave
pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "designer", "designer")
}

/// Read a scene JSON file (an array of objects)
pub fn load_scene_file(path: &Path) -> DesignResult<Scene> {
    let json = std::fs::read_to_string(path)?;
    let mut scene: Scene = serde_json::from_str(&json)?;
    let fixed = normalize_scene(&mut scene);
    if fixed > 0 {
        tracing::warn!("{}: {} objects needed fixing", path.display(), fixed);
    }
    Ok(scene)
}

/// Write a scene as pretty-printed JSON
pub fn save_scene_file(path: &Path, scene: &Scene) -> DesignResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(scene)?)?;
    Ok(())
}

/// Autosave location: `<data dir>/autosave.json`
pub fn autosave_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("autosave.json"))
}

impl SceneState {
    /// Save the scene to the autosave file. Failures are logged, not returned.
    pub fn autosave(&self) {
        if let Some(path) = autosave_path() {
            self.autosave_to(&path);
        }
    }

    /// Save the scene to `path`, logging instead of failing
    pub fn autosave_to(&self, path: &Path) -> bool {
        match save_scene_file(path, &self.scene) {
            Ok(()) => {
                tracing::debug!("Autosaved {} objects to {}", self.len(), path.display());
                true
            }
            Err(e) => {
                tracing::warn!("Autosave to {} failed: {}", path.display(), e);
                false
            }
        }
    }

    /// Scene from the autosave file, if there is a readable one
    pub fn load_autosave() -> Option<Scene> {
        let path = autosave_path()?;
        if !path.exists() {
            return None;
        }
        match load_scene_file(&path) {
            Ok(scene) => Some(scene),
            Err(e) => {
                tracing::warn!("Ignoring autosave {}: {}", path.display(), e);
                None
            }
        }
    }
}
