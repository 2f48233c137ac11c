//! Object creation, editing and removal

use std::collections::HashSet;

use rand::Rng;
use shared::{Color, DesignObject, ObjectId, ObjectPatch, ObjectSpec, Scene, ShapeKind, MAX_OBJECTS};

use super::SceneState;
use crate::error::{DesignError, DesignResult};

/// Fresh unique object id
pub fn new_object_id() -> ObjectId {
    uuid::Uuid::new_v4().to_string()
}

fn random_color() -> Color {
    Color::from_u32(rand::thread_rng().gen_range(0..=0xFF_FFFF))
}

/// Bring a scene from outside (file, share code, import) in line with the
/// object invariants: values are clamped and every id is unique.
///
/// An object whose id is empty or already taken earlier in the list gets a
/// fresh id. Returns how many objects were changed.
pub fn normalize_scene(scene: &mut Scene) -> usize {
    let mut seen = HashSet::with_capacity(scene.len());
    let mut changed = 0;
    for object in &mut scene.objects {
        let mut fixed = object.sanitize();
        if object.id.is_empty() || !seen.insert(object.id.clone()) {
            let id = new_object_id();
            tracing::warn!("Duplicate object id {:?}, reassigned to {}", object.id, id);
            object.id = id.clone();
            seen.insert(id);
            fixed = true;
        }
        if fixed {
            changed += 1;
        }
    }
    changed
}

impl SceneState {
    fn ensure_room(&self, extra: usize) -> DesignResult<()> {
        if self.scene.len() + extra > MAX_OBJECTS {
            tracing::warn!(
                "Scene full: {} objects, {} more requested",
                self.scene.len(),
                extra
            );
            return Err(DesignError::SceneFull { max: MAX_OBJECTS });
        }
        Ok(())
    }

    /// Append a new object of `kind` with default placement
    pub fn add(&mut self, kind: ShapeKind) -> DesignResult<ObjectId> {
        self.ensure_room(1)?;
        if !kind.is_known() {
            tracing::warn!("Unknown shape kind {:?}, it will render as a box", kind.as_str());
        }
        let id = new_object_id();
        let name = format!("{}-{}", kind, self.scene.len() + 1);
        let mut object = DesignObject::new(id.clone(), kind, name);
        object.color = random_color();
        self.scene.objects.push(object);
        self.version += 1;
        self.save_snapshot();
        Ok(id)
    }

    /// Copy an object, offset by +1 on X and Z. `Ok(None)` if `id` is missing.
    pub fn duplicate(&mut self, id: &str) -> DesignResult<Option<ObjectId>> {
        let Some(source) = self.scene.get(id) else {
            return Ok(None);
        };
        let mut copy = source.clone();
        self.ensure_room(1)?;

        copy.id = new_object_id();
        copy.name = format!("{}-copy", copy.name);
        copy.position.x += 1.0;
        copy.position.z += 1.0;
        copy.sanitize();
        let new_id = copy.id.clone();

        self.scene.objects.push(copy);
        self.version += 1;
        self.save_snapshot();
        Ok(Some(new_id))
    }

    /// Remove an object. Returns false if it did not exist.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.scene.len();
        self.scene.objects.retain(|o| o.id != id);
        if self.scene.len() == before {
            return false;
        }
        self.version += 1;
        self.save_snapshot();
        true
    }

    /// Merge a patch without recording history (live gesture)
    pub fn update_property(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        let Some(object) = self.scene.get_mut(id) else {
            return false;
        };
        object.apply(patch);
        self.version += 1;
        true
    }

    /// Merge a patch and record a snapshot (gesture end)
    pub fn commit(&mut self, id: &str, patch: &ObjectPatch) -> bool {
        if !self.update_property(id, patch) {
            return false;
        }
        self.save_snapshot();
        true
    }

    /// Remove every object
    pub fn clear(&mut self) {
        self.scene.objects.clear();
        self.version += 1;
        self.save_snapshot();
    }

    /// Append a batch of id-less specs with a single snapshot. All or nothing.
    pub fn add_objects(&mut self, specs: Vec<ObjectSpec>) -> DesignResult<Vec<ObjectId>> {
        if specs.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_room(specs.len())?;

        let objects: Vec<DesignObject> = specs
            .into_iter()
            .map(|spec| spec.into_object(new_object_id()))
            .collect();
        let ids = objects.iter().map(|o| o.id.clone()).collect();

        self.scene.objects.extend(objects);
        self.version += 1;
        self.save_snapshot();
        Ok(ids)
    }

    /// Replace the whole scene (import) and record a snapshot
    pub fn replace(&mut self, mut scene: Scene) -> DesignResult<()> {
        if scene.len() > MAX_OBJECTS {
            return Err(DesignError::SceneFull { max: MAX_OBJECTS });
        }
        normalize_scene(&mut scene);
        tracing::info!("Scene replaced: {} objects", scene.len());
        self.set_scene(scene);
        self.save_snapshot();
        Ok(())
    }
}
