use shared::{ObjectId, Scene};

/// Single-object selection. Always a live id or nothing.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<ObjectId>,
}

impl SelectionState {
    /// Currently selected object
    pub fn primary(&self) -> Option<&ObjectId> {
        self.selected.as_ref()
    }

    /// Check if an object is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Select an object if it exists in the scene. Returns false otherwise.
    pub fn select(&mut self, id: &str, scene: &Scene) -> bool {
        if !scene.contains(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if its object is gone (after delete/undo/import)
    pub fn retain_existing(&mut self, scene: &Scene) {
        if let Some(id) = &self.selected {
            if !scene.contains(id) {
                self.selected = None;
            }
        }
    }
}
