//! Drawing surface: owns the scene, its size and the interaction wiring.

use crate::scene::{Scene, SceneSnapshot};
use crate::shapes::{CompositeKind, Interaction, Shape, ShapeId};
use crate::widget::{WidgetManager, WidgetState};
use kurbo::{Point, Size, Vec2};

/// How existing objects respond to the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    /// Objects are selectable and draggable.
    #[default]
    Select,
    /// Objects are inert so drawing gestures pass through them.
    Draw,
}

/// Pointer affordance the host should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Crosshair,
}

/// The surface adapter between the scene and pointer input.
#[derive(Debug, Clone)]
pub struct Surface {
    scene: Scene,
    size: Size,
    mode: InteractionMode,
    widgets: WidgetManager,
    tolerance: f64,
}

impl Surface {
    pub fn new(size: Size, tolerance: f64) -> Self {
        Self {
            scene: Scene::new(),
            size,
            mode: InteractionMode::default(),
            widgets: WidgetManager::new(),
            tolerance,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Match the host container's new bounds. The scene is untouched.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Selection, hover or edit state of one object.
    pub fn widget_state(&self, id: ShapeId) -> WidgetState {
        self.widgets.state(id)
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Add an object on top, keeping its own interaction flags.
    pub fn add_object(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.scene.add_shape(shape);
        id
    }

    /// Remove an object and any UI state attached to it.
    pub fn remove_object(&mut self, id: ShapeId) -> Option<Shape> {
        self.widgets.remove(id);
        self.scene.remove_shape(id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.scene.get_shape(id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.scene.get_shape_mut(id)
    }

    /// Objects in paint order.
    pub fn objects(&self) -> Vec<&Shape> {
        self.scene.shapes_ordered().collect()
    }

    /// Topmost evented object under `point`.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.scene.hit_test(point, self.tolerance)
    }

    pub fn serialize(&self) -> SceneSnapshot {
        self.scene.serialize()
    }

    /// Replace every object, drop all UI state and re-wire interaction.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.scene.restore(snapshot);
        self.widgets.reset();
        self.apply_mode();
    }

    /// Switch between select and draw wiring for every top-level object.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
        if mode == InteractionMode::Draw {
            self.widgets.clear_selection();
            self.widgets.set_hovered(None);
        }
        self.apply_mode();
    }

    fn apply_mode(&mut self) {
        let flags = self.mode_interaction();
        for shape in self.scene.shapes_mut() {
            shape.set_interaction(flags);
        }
    }

    /// Flags the current mode gives to top-level objects.
    pub fn mode_interaction(&self) -> Interaction {
        match self.mode {
            InteractionMode::Select => Interaction::LIVE,
            InteractionMode::Draw => Interaction::INERT,
        }
    }

    /// Set one object's flags, overriding the mode.
    pub fn set_interaction(&mut self, id: ShapeId, interaction: Interaction) {
        if let Some(shape) = self.scene.get_shape_mut(id) {
            shape.set_interaction(interaction);
        }
    }

    pub fn cursor(&self) -> Cursor {
        match self.mode {
            InteractionMode::Draw => Cursor::Crosshair,
            InteractionMode::Select if self.widgets.hovered().is_some() => Cursor::Move,
            InteractionMode::Select => Cursor::Default,
        }
    }

    /// Track the object under the pointer for the hover affordance.
    pub fn update_hover(&mut self, point: Point) {
        let hovered = match self.mode {
            InteractionMode::Select => self.hit_test(point),
            InteractionMode::Draw => None,
        };
        self.widgets.set_hovered(hovered);
    }

    pub fn select(&mut self, id: ShapeId) {
        self.widgets.select(id);
    }

    /// Shift-click behavior: add if absent, remove if present.
    pub fn toggle_selection(&mut self, id: ShapeId) {
        if self.widgets.is_selected(id) {
            self.widgets.deselect(id);
        } else {
            self.widgets.add_to_selection(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.widgets.clear_selection();
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.widgets.is_selected(id)
    }

    /// Selected top-level objects in paint order.
    pub fn selected_ids(&self) -> Vec<ShapeId> {
        self.scene
            .ids()
            .iter()
            .copied()
            .filter(|id| self.widgets.is_selected(*id))
            .collect()
    }

    /// Give a textbox edit focus; it becomes the sole selection.
    pub fn focus_text(&mut self, id: ShapeId) {
        self.widgets.select(id);
        self.widgets.enter_editing(id);
    }

    /// Drop edit focus, keeping the object selected if it still exists.
    pub fn blur_text(&mut self) {
        self.widgets.exit_editing();
    }

    /// Move every selected object. Returns whether anything moved.
    pub fn translate_selected(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        let mut moved = false;
        for id in self.selected_ids() {
            if let Some(shape) = self.scene.get_shape_mut(id) {
                shape.translate(delta);
                moved = true;
            }
        }
        moved
    }

    /// Replace loose objects with one composite wired for the current mode.
    pub fn group_objects(&mut self, ids: &[ShapeId], kind: CompositeKind) -> Option<ShapeId> {
        let group_id = self.scene.group_shapes(ids, kind)?;
        for id in ids {
            self.widgets.remove(*id);
        }
        let flags = self.mode_interaction();
        self.set_interaction(group_id, flags);
        Some(group_id)
    }

    /// Dissolve a composite in place. Children come back inert.
    pub fn ungroup_object(&mut self, group_id: ShapeId) -> Option<Vec<ShapeId>> {
        let children = self.scene.ungroup_shape(group_id)?;
        self.widgets.remove(group_id);
        for id in &children {
            self.set_interaction(*id, Interaction::INERT);
        }
        Some(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;

    fn surface_with_rect() -> (Surface, ShapeId) {
        let mut surface = Surface::new(Size::new(800.0, 600.0), 4.0);
        let id = surface.add_object(Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 50.0, 50.0)));
        surface.set_mode(InteractionMode::Select);
        (surface, id)
    }

    #[test]
    fn test_draw_mode_makes_objects_inert() {
        let (mut surface, id) = surface_with_rect();
        assert_eq!(surface.hit_test(Point::new(20.0, 20.0)), Some(id));
        surface.set_mode(InteractionMode::Draw);
        assert_eq!(surface.hit_test(Point::new(20.0, 20.0)), None);
        assert_eq!(surface.cursor(), Cursor::Crosshair);
    }

    #[test]
    fn test_hover_cursor() {
        let (mut surface, _) = surface_with_rect();
        surface.update_hover(Point::new(20.0, 20.0));
        assert_eq!(surface.cursor(), Cursor::Move);
        surface.update_hover(Point::new(400.0, 400.0));
        assert_eq!(surface.cursor(), Cursor::Default);
    }

    #[test]
    fn test_restore_rewires_and_clears_selection() {
        let (mut surface, id) = surface_with_rect();
        let snapshot = surface.serialize();
        surface.select(id);
        surface.set_interaction(id, Interaction::INERT);
        surface.restore(&snapshot);
        assert!(surface.selected_ids().is_empty());
        assert_eq!(surface.hit_test(Point::new(20.0, 20.0)), Some(id));
    }

    #[test]
    fn test_text_focus_and_removal() {
        let (mut surface, id) = surface_with_rect();
        surface.focus_text(id);
        assert_eq!(surface.widget_state(id), WidgetState::Editing);
        surface.blur_text();
        assert_eq!(surface.widget_state(id), WidgetState::Selected);
        surface.remove_object(id);
        assert_eq!(surface.widget_state(id), WidgetState::Normal);
        assert!(surface.selected_ids().is_empty());
    }

    #[test]
    fn test_translate_selected() {
        let (mut surface, id) = surface_with_rect();
        assert!(!surface.translate_selected(Vec2::new(5.0, 0.0)));
        surface.select(id);
        assert!(surface.translate_selected(Vec2::new(5.0, 0.0)));
        assert_eq!(surface.get(id).unwrap().bounds().x0, 15.0);
    }

    #[test]
    fn test_resize_keeps_scene() {
        let (mut surface, _) = surface_with_rect();
        surface.resize(Size::new(1024.0, 768.0));
        assert_eq!(surface.size(), Size::new(1024.0, 768.0));
        assert_eq!(surface.objects().len(), 1);
    }
}
