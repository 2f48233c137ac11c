//! World-space mesh building.
//!
//! The scene object list is the source of truth; the meshes built here are a
//! disposable projection of it, rebuilt whenever the scene version changes.

mod cache;
mod polyhedra;
mod primitives;
mod transform;

pub use cache::MeshCache;
pub use primitives::generate_mesh;
pub use transform::{euler_rotation, object_matrix, to_world};

use std::collections::HashMap;

use shared::{Color, DesignObject, ObjectId, Scene};

use crate::mesh::Mesh;

/// One object's world-space mesh plus what a viewer needs to draw it
#[derive(Debug, Clone)]
pub struct ObjectMesh {
    pub id: ObjectId,
    pub name: String,
    pub color: Color,
    pub opacity: f64,
    pub mesh: Mesh,
}

/// Generate an object's local mesh and move it into world space.
pub fn build_object_mesh(object: &DesignObject) -> Result<Mesh, String> {
    let local = generate_mesh(&object.kind, object.scale);
    if local.is_empty() {
        return Err(format!("{} generated an empty mesh", object.kind));
    }
    let world = to_world(&local, object.position, object.rotation);
    if !world.vertices.iter().all(|v| v.is_finite()) {
        return Err(format!("{:?} has non-finite vertices", object.name));
    }
    Ok(world)
}

/// Build world meshes for every object, in scene order.
///
/// Objects that fail to build are reported in the error map and skipped.
pub fn build_scene_meshes(scene: &Scene) -> (Vec<ObjectMesh>, HashMap<ObjectId, String>) {
    let mut meshes = Vec::with_capacity(scene.len());
    let mut errors = HashMap::new();

    for object in &scene.objects {
        match build_object_mesh(object) {
            Ok(mesh) => meshes.push(ObjectMesh {
                id: object.id.clone(),
                name: object.name.clone(),
                color: object.color,
                opacity: object.opacity,
                mesh,
            }),
            Err(msg) => {
                tracing::warn!("Skipping object {}: {}", object.id, msg);
                errors.insert(object.id.clone(), msg);
            }
        }
    }

    (meshes, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use shared::ShapeKind;

    #[test]
    fn test_build_empty_scene() {
        let (meshes, errors) = build_scene_meshes(&empty_scene());
        assert!(meshes.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_build_keeps_scene_order() {
        let scene = scene_of(vec![
            object_at("b", ShapeKind::Sphere, [0.0, 0.0, 0.0]),
            object_at("a", ShapeKind::Box, [3.0, 0.0, 0.0]),
        ]);
        let (meshes, errors) = build_scene_meshes(&scene);
        assert!(errors.is_empty());
        let ids: Vec<&str> = meshes.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_build_applies_position() {
        let scene = scene_of(vec![object_at("a", ShapeKind::Box, [3.0, 1.0, -2.0])]);
        let (meshes, _) = build_scene_meshes(&scene);
        let center = meshes[0].mesh.aabb().center();
        assert!((center - glam::DVec3::new(3.0, 1.0, -2.0)).length() < 1e-9);
    }

    #[test]
    fn test_build_reports_non_finite_object() {
        let mut bad = object_at("bad", ShapeKind::Box, [0.0, 0.0, 0.0]);
        bad.position.x = f64::INFINITY;
        let scene = scene_of(vec![bad, object_at("ok", ShapeKind::Cone, [0.0, 0.0, 0.0])]);
        let (meshes, errors) = build_scene_meshes(&scene);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].id, "ok");
        assert!(errors.contains_key("bad"));
    }
}
