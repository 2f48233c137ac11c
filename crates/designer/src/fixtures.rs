//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct `DesignObject`, `Scene`,
//! and other types used in tests and by the command interface.

use shared::*;

// ── Object factories ────────────────────────────────────────────

/// Object of the given kind with default transform at `pos`.
pub fn object_at(id: &str, kind: ShapeKind, pos: [f64; 3]) -> DesignObject {
    let mut object = DesignObject::new(id.to_string(), kind.clone(), format!("{kind}-{id}"));
    object.position = pos.into();
    object
}

/// Unit box at the world origin.
pub fn unit_box_at_origin(id: &str) -> DesignObject {
    object_at(id, ShapeKind::Box, [0.0, 0.0, 0.0])
}

/// Box with explicit scale.
pub fn box_scaled(id: &str, scale: [f64; 3]) -> DesignObject {
    let mut object = unit_box_at_origin(id);
    object.scale = scale.into();
    object
}

/// One object of every known kind, spaced along X.
pub fn one_of_each_kind() -> Vec<DesignObject> {
    ShapeKind::all()
        .iter()
        .enumerate()
        .map(|(i, kind)| object_at(&format!("{kind}{i}"), kind.clone(), [i as f64 * 3.0, 0.0, 0.0]))
        .collect()
}

/// Id-less spec like the assistant returns.
pub fn spec_of(kind: ShapeKind, name: &str, pos: [f64; 3]) -> ObjectSpec {
    ObjectSpec {
        kind,
        name: name.to_string(),
        position: pos.into(),
        rotation: Vector3::ZERO,
        scale: Vector3::ONE,
        color: Color::GRAY,
        opacity: 1.0,
    }
}

// ── Scene factories ─────────────────────────────────────────────

/// Wrap objects into a Scene.
pub fn scene_of(objects: Vec<DesignObject>) -> Scene {
    Scene::new(objects)
}

/// Empty scene.
pub fn empty_scene() -> Scene {
    Scene::default()
}

/// Scene with a single unit box ("box1").
pub fn scene_single_box() -> Scene {
    scene_of(vec![unit_box_at_origin("box1")])
}

/// Scene with multiple primitives.
pub fn scene_multiple_primitives() -> Scene {
    scene_of(vec![
        object_at("b1", ShapeKind::Box, [0.0, 0.5, 0.0]),
        object_at("cy1", ShapeKind::Cylinder, [2.0, 0.5, 0.0]),
        object_at("sp1", ShapeKind::Sphere, [-2.0, 0.5, 0.0]),
        object_at("co1", ShapeKind::Cone, [0.0, 0.5, 2.0]),
    ])
}

/// Scene with one object of every kind.
pub fn scene_all_kinds() -> Scene {
    scene_of(one_of_each_kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_at_factory() {
        let object = object_at("s1", ShapeKind::Sphere, [1.0, 2.0, 3.0]);
        assert_eq!(object.id, "s1");
        assert_eq!(object.kind, ShapeKind::Sphere);
        assert_eq!(object.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(object.scale, Vector3::ONE);
        assert_eq!(object.opacity, 1.0);
    }

    #[test]
    fn test_scene_factories() {
        assert!(empty_scene().is_empty());
        assert!(scene_single_box().contains("box1"));
        assert_eq!(scene_multiple_primitives().len(), 4);
        assert_eq!(scene_all_kinds().len(), ShapeKind::all().len());
    }

    #[test]
    fn test_one_of_each_kind_has_unique_ids() {
        let objects = one_of_each_kind();
        let mut ids: Vec<&str> = objects.iter().map(|o| o.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), objects.len());
    }

    #[test]
    fn test_spec_of_becomes_object() {
        let object = spec_of(ShapeKind::Torus, "ring", [0.0, 1.0, 0.0]).into_object("t".into());
        assert_eq!(object.id, "t");
        assert_eq!(object.name, "ring");
    }
}
