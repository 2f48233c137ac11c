//! World mesh cache, rebuilt when the scene version changes

use std::collections::HashMap;

use shared::{ObjectId, Scene};

use super::{build_scene_meshes, ObjectMesh};
use crate::mesh::Aabb;

/// Cached world meshes for the current scene version
pub struct MeshCache {
    meshes: Vec<ObjectMesh>,
    aabbs: HashMap<ObjectId, Aabb>,
    errors: HashMap<ObjectId, String>,
    version: u64,
    rebuild_count: u64,
}

impl Default for MeshCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshCache {
    pub fn new() -> Self {
        Self {
            meshes: Vec::new(),
            aabbs: HashMap::new(),
            errors: HashMap::new(),
            version: u64::MAX, // force first rebuild
            rebuild_count: 0,
        }
    }

    /// Check if cache is still valid
    pub fn is_valid(&self, scene_version: u64) -> bool {
        self.version == scene_version
    }

    /// Rebuild cached meshes from the scene
    pub fn rebuild(&mut self, scene: &Scene, version: u64) {
        let (meshes, errors) = build_scene_meshes(scene);
        self.aabbs = meshes
            .iter()
            .map(|m| (m.id.clone(), m.mesh.aabb()))
            .collect();
        self.meshes = meshes;
        self.errors = errors;
        self.version = version;
        self.rebuild_count += 1;
    }

    /// Rebuild only if the scene changed since the last build
    pub fn refresh(&mut self, scene: &Scene, version: u64) -> &[ObjectMesh] {
        if !self.is_valid(version) {
            self.rebuild(scene, version);
        }
        &self.meshes
    }

    pub fn meshes(&self) -> &[ObjectMesh] {
        &self.meshes
    }

    pub fn mesh_of(&self, id: &str) -> Option<&ObjectMesh> {
        self.meshes.iter().find(|m| m.id == id)
    }

    /// Rebuild counter
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    /// Get the cached AABBs
    pub fn aabbs(&self) -> &HashMap<ObjectId, Aabb> {
        &self.aabbs
    }

    /// Get build errors
    pub fn errors(&self) -> &HashMap<ObjectId, String> {
        &self.errors
    }
}
