//! Selection, hover and edit focus, kept beside the scene.

use super::state::WidgetState;
use crate::shapes::ShapeId;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct WidgetManager {
    selected: HashSet<ShapeId>,
    hovered: Option<ShapeId>,
    /// Textbox holding edit focus. Always also selected.
    editing: Option<ShapeId>,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strongest state of an object: editing, then selected, then hovered.
    pub fn state(&self, id: ShapeId) -> WidgetState {
        if self.editing == Some(id) {
            WidgetState::Editing
        } else if self.selected.contains(&id) {
            WidgetState::Selected
        } else if self.hovered == Some(id) {
            WidgetState::Hovered
        } else {
            WidgetState::Normal
        }
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    pub fn set_hovered(&mut self, id: Option<ShapeId>) {
        self.hovered = id;
    }

    /// Make `id` the only selected object.
    pub fn select(&mut self, id: ShapeId) {
        self.clear_selection();
        self.selected.insert(id);
    }

    pub fn add_to_selection(&mut self, id: ShapeId) {
        self.selected.insert(id);
    }

    /// Deselecting the edited textbox also drops its focus.
    pub fn deselect(&mut self, id: ShapeId) {
        self.selected.remove(&id);
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    /// Clear the selection, including edit focus.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.editing = None;
    }

    /// Focus a textbox for editing. Only one object holds focus.
    pub fn enter_editing(&mut self, id: ShapeId) {
        self.selected.insert(id);
        self.editing = Some(id);
    }

    /// Drop edit focus; the object stays selected.
    pub fn exit_editing(&mut self) {
        self.editing = None;
    }

    /// Forget a deleted object.
    pub fn remove(&mut self, id: ShapeId) {
        self.deselect(id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_select_replaces() {
        let mut widgets = WidgetManager::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        widgets.select(a);
        widgets.select(b);
        assert!(!widgets.is_selected(a));
        assert!(widgets.is_selected(b));
    }

    #[test]
    fn test_editing_keeps_selection() {
        let mut widgets = WidgetManager::new();
        let id = Uuid::new_v4();
        widgets.enter_editing(id);
        assert_eq!(widgets.state(id), WidgetState::Editing);
        assert!(widgets.state(id).is_selected());
        widgets.exit_editing();
        assert_eq!(widgets.state(id), WidgetState::Selected);
    }

    #[test]
    fn test_single_focus() {
        let mut widgets = WidgetManager::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        widgets.enter_editing(a);
        widgets.enter_editing(b);
        assert_eq!(widgets.state(a), WidgetState::Selected);
        assert_eq!(widgets.state(b), WidgetState::Editing);
    }

    #[test]
    fn test_hover_ranks_below_selection() {
        let mut widgets = WidgetManager::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        widgets.select(a);
        widgets.set_hovered(Some(a));
        assert_eq!(widgets.state(a), WidgetState::Selected);
        widgets.set_hovered(Some(b));
        assert_eq!(widgets.state(b), WidgetState::Hovered);
        widgets.remove(b);
        assert_eq!(widgets.hovered(), None);
    }

    #[test]
    fn test_remove_drops_focus() {
        let mut widgets = WidgetManager::new();
        let id = Uuid::new_v4();
        widgets.enter_editing(id);
        widgets.remove(id);
        assert_eq!(widgets.state(id), WidgetState::Normal);
    }
}
