//! Scene model: the ordered set of top-level objects.

use crate::error::SnapshotError;
use crate::shapes::{CompositeKind, Group, Shape, ShapeId, ShapeTrait};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable, serializable copy of every object in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub objects: Vec<Shape>,
}

impl SceneSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// All objects on the surface, keyed by ID, with a separate paint order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of everything else.
    pub fn add_shape(&mut self, shape: Shape) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
    }

    /// Add a shape at a paint position (clamped to the top).
    pub fn insert_shape(&mut self, index: usize, shape: Shape) {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            let index = index.min(self.z_order.len());
            self.z_order.insert(index, id);
        }
    }

    /// Remove a shape from the scene.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        self.shapes.remove(&id)
    }

    /// Clear all shapes from the scene.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.z_order.clear();
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Paint position of a shape.
    pub fn z_index(&self, id: ShapeId) -> Option<usize> {
        self.z_order.iter().position(|&shape_id| shape_id == id)
    }

    /// Get shapes in z-order (back to front).
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// IDs in z-order (back to front).
    pub fn ids(&self) -> &[ShapeId] {
        &self.z_order
    }

    /// Mutable access to every top-level shape.
    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.values_mut()
    }

    /// Topmost evented shape under `point`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.shapes
                .get(id)
                .is_some_and(|s| s.interaction().evented && s.hit_test(point, tolerance))
        })
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Copy every object, in paint order.
    pub fn serialize(&self) -> SceneSnapshot {
        SceneSnapshot {
            objects: self.shapes_ordered().cloned().collect(),
        }
    }

    /// Replace the whole object set with a snapshot.
    pub fn restore(&mut self, snapshot: &SceneSnapshot) {
        self.clear();
        for shape in &snapshot.objects {
            self.add_shape(shape.clone());
        }
    }

    /// Group the given shapes into a tagged composite.
    ///
    /// Returns the new group's ID, or None if fewer than 2 of the shapes are
    /// in the scene. Members keep their relative paint order and the group
    /// takes the place of the frontmost member.
    pub fn group_shapes(&mut self, shape_ids: &[ShapeId], kind: CompositeKind) -> Option<ShapeId> {
        let members: Vec<(usize, ShapeId)> = self
            .z_order
            .iter()
            .enumerate()
            .filter(|(_, id)| shape_ids.contains(id))
            .map(|(idx, id)| (idx, *id))
            .collect();
        if members.len() < 2 {
            return None;
        }

        let max_z_idx = members.iter().map(|(idx, _)| *idx).max()?;
        let insert_pos = max_z_idx + 1 - members.len();

        let children: Vec<Shape> = members
            .iter()
            .filter_map(|(_, id)| self.remove_shape(*id))
            .collect();
        let group = Group::new(children).with_kind(kind);
        let group_id = group.id();
        self.insert_shape(insert_pos, Shape::Group(group));
        Some(group_id)
    }

    /// Dissolve a group, putting its children (at absolute coordinates)
    /// where the group was. Returns the children's IDs.
    pub fn ungroup_shape(&mut self, group_id: ShapeId) -> Option<Vec<ShapeId>> {
        let z_pos = self.z_index(group_id)?;
        let group = match self.remove_shape(group_id) {
            Some(Shape::Group(g)) => g,
            Some(other) => {
                self.insert_shape(z_pos, other);
                return None;
            }
            None => return None,
        };

        let children = group.ungroup();
        let child_ids: Vec<ShapeId> = children.iter().map(Shape::id).collect();
        for (i, child) in children.into_iter().enumerate() {
            self.insert_shape(z_pos + i, child);
        }
        Some(child_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Interaction, Line, Rectangle};

    fn live_rect(x: f64) -> Shape {
        let mut rect = Rectangle::new(Point::new(x, 0.0), 10.0, 10.0);
        rect.interaction = Interaction::LIVE;
        Shape::Rectangle(rect)
    }

    #[test]
    fn test_add_and_remove() {
        let mut scene = Scene::new();
        let shape = live_rect(0.0);
        let id = shape.id();
        scene.add_shape(shape);
        assert_eq!(scene.len(), 1);
        assert!(scene.remove_shape(id).is_some());
        assert!(scene.is_empty());
        assert!(scene.ids().is_empty());
    }

    #[test]
    fn test_hit_test_topmost_evented() {
        let mut scene = Scene::new();
        let bottom = live_rect(0.0);
        let bottom_id = bottom.id();
        let mut top = live_rect(0.0);
        top.set_interaction(Interaction::INERT);
        scene.add_shape(bottom);
        scene.add_shape(top);
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0), 1.0), Some(bottom_id));

        let upper = live_rect(0.0);
        let upper_id = upper.id();
        scene.add_shape(upper);
        assert_eq!(scene.hit_test(Point::new(5.0, 5.0), 1.0), Some(upper_id));
        assert_eq!(scene.hit_test(Point::new(500.0, 5.0), 1.0), None);
    }

    #[test]
    fn test_serialize_restore_replaces() {
        let mut scene = Scene::new();
        scene.add_shape(live_rect(0.0));
        let snapshot = scene.serialize();

        scene.add_shape(live_rect(50.0));
        scene.restore(&snapshot);
        assert_eq!(scene.serialize(), snapshot);
    }

    #[test]
    fn test_group_takes_frontmost_position() {
        let mut scene = Scene::new();
        let a = live_rect(0.0);
        let other = live_rect(100.0);
        let b = Shape::Line(Line::new(Point::ZERO, Point::new(5.0, 5.0)));
        let (a_id, other_id, b_id) = (a.id(), other.id(), b.id());
        scene.add_shape(a);
        scene.add_shape(other);
        scene.add_shape(b);

        let group_id = scene.group_shapes(&[a_id, b_id], CompositeKind::Arrow).unwrap();
        assert_eq!(scene.ids(), &[other_id, group_id]);
        let group = scene.get_shape(group_id).unwrap().as_group().unwrap();
        assert_eq!(group.children()[0].id(), a_id);
        assert_eq!(group.custom_type, Some(CompositeKind::Arrow));
    }

    #[test]
    fn test_group_needs_two_members() {
        let mut scene = Scene::new();
        let a = live_rect(0.0);
        let a_id = a.id();
        scene.add_shape(a);
        assert!(scene.group_shapes(&[a_id], CompositeKind::Arrow).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ungroup_restores_position() {
        let mut scene = Scene::new();
        let a = live_rect(0.0);
        let b = live_rect(20.0);
        let top = live_rect(40.0);
        let (a_id, b_id, top_id) = (a.id(), b.id(), top.id());
        scene.add_shape(a);
        scene.add_shape(b);
        let group_id = scene.group_shapes(&[a_id, b_id], CompositeKind::Arrow).unwrap();
        scene.add_shape(top);

        let children = scene.ungroup_shape(group_id).unwrap();
        assert_eq!(children, vec![a_id, b_id]);
        assert_eq!(scene.ids(), &[a_id, b_id, top_id]);
        assert!(scene.ungroup_shape(top_id).is_none());
        assert!(scene.contains(top_id));
    }
}
