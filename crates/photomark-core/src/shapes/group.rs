//! Group shape: composite objects that select, move and delete as one unit.

use super::{Interaction, Shape, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Marker telling composites apart, persisted as `customType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompositeKind {
    Arrow,
    LeaderLine,
}

/// A group of shapes that is manipulated as a single unit.
///
/// Children keep the coordinates they had when grouped; moving the group
/// only changes `offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes in paint order.
    pub children: Vec<Shape>,
    #[serde(rename = "customType", default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<CompositeKind>,
    /// Translation applied to every child.
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default)]
    pub interaction: Interaction,
    style: ShapeStyle,
}

impl Group {
    /// Create a new group from a list of shapes. Members become inert.
    pub fn new(children: Vec<Shape>) -> Self {
        let mut children = children;
        for child in &mut children {
            child.set_interaction(Interaction::INERT);
        }
        Self {
            id: Uuid::new_v4(),
            children,
            custom_type: None,
            offset: Vec2::ZERO,
            interaction: Interaction::default(),
            style: ShapeStyle::default(),
        }
    }

    /// Builder: tag the composite.
    pub fn with_kind(mut self, kind: CompositeKind) -> Self {
        self.custom_type = Some(kind);
        self
    }

    /// Get the children of this group.
    pub fn children(&self) -> &[Shape] {
        &self.children
    }

    /// Dissolve this group, returning its children at absolute coordinates.
    pub fn ungroup(self) -> Vec<Shape> {
        let offset = self.offset;
        self.children
            .into_iter()
            .map(|mut child| {
                if offset != Vec2::ZERO {
                    child.translate(offset);
                }
                child
            })
            .collect()
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let Some((first, rest)) = self.children.split_first() else {
            return Rect::ZERO;
        };
        rest.iter()
            .fold(first.bounds(), |acc, child| acc.union(child.bounds()))
            + self.offset
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = point - self.offset;
        self.children
            .iter()
            .any(|child| child.hit_test(local, tolerance))
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        for child in &self.children {
            path.extend(child.to_path());
        }
        Affine::translate(self.offset) * path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn interaction(&self) -> Interaction {
        self.interaction
    }

    fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    fn transform(&mut self, affine: Affine) {
        let baked = affine * Affine::translate(self.offset);
        for child in &mut self.children {
            child.transform(baked);
        }
        self.offset = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Rectangle};

    #[test]
    fn test_group_members_are_inert() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        rect.interaction = Interaction::LIVE;
        let group = Group::new(vec![Shape::Rectangle(rect)]);
        assert!(!group.children()[0].interaction().selectable);
    }

    #[test]
    fn test_group_bounds_follow_offset() {
        let rect1 = Rectangle::new(Point::new(0.0, 0.0), 50.0, 50.0);
        let rect2 = Rectangle::new(Point::new(100.0, 100.0), 50.0, 50.0);
        let mut group = Group::new(vec![Shape::Rectangle(rect1), Shape::Rectangle(rect2)]);
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 150.0, 150.0));
        group.offset = Vec2::new(10.0, 5.0);
        assert_eq!(group.bounds(), Rect::new(10.0, 5.0, 160.0, 155.0));
    }

    #[test]
    fn test_group_hit_test_with_offset() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut group = Group::new(vec![Shape::Line(line)]);
        group.offset = Vec2::new(0.0, 50.0);
        assert!(group.hit_test(Point::new(50.0, 50.0), 1.0));
        assert!(!group.hit_test(Point::new(50.0, 0.0), 1.0));
    }

    #[test]
    fn test_ungroup_applies_offset() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let mut group = Group::new(vec![Shape::Line(line)]);
        group.offset = Vec2::new(5.0, 5.0);
        let children = group.ungroup();
        match &children[0] {
            Shape::Line(l) => {
                assert_eq!(l.start, Point::new(5.0, 5.0));
                assert_eq!(l.end, Point::new(15.0, 5.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_custom_type_serialized_name() {
        let group = Group::new(vec![]).with_kind(CompositeKind::LeaderLine);
        let json = serde_json::to_value(&group).unwrap();
        assert_eq!(json["customType"], "leaderLine");
    }
}
