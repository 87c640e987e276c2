//! Arrowhead (isosceles triangle) shape.

use super::{Interaction, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which point of the triangle `position` refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadAnchor {
    /// `position` is the apex.
    #[default]
    Tip,
    /// `position` is the midpoint of the base.
    Base,
}

/// A filled isosceles triangle.
///
/// `angle` is in degrees, clockwise in surface coordinates, with 0 meaning
/// the apex points straight up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrowhead {
    pub(crate) id: ShapeId,
    /// Anchor point, see [`HeadAnchor`].
    pub position: Point,
    /// Base width.
    pub width: f64,
    /// Distance from base to apex.
    pub height: f64,
    /// Rotation in degrees.
    pub angle: f64,
    #[serde(default)]
    pub anchor: HeadAnchor,
    /// Style properties.
    pub style: ShapeStyle,
    #[serde(default)]
    pub interaction: Interaction,
}

impl Arrowhead {
    /// Create a new arrowhead.
    pub fn new(position: Point, width: f64, height: f64, angle: f64, anchor: HeadAnchor) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
            angle,
            anchor,
            style: ShapeStyle::default(),
            interaction: Interaction::default(),
        }
    }

    /// Builder: set the style.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Unit vector from the base toward the apex.
    pub fn axis(&self) -> Vec2 {
        let rad = self.angle.to_radians();
        Vec2::new(rad.sin(), -rad.cos())
    }

    /// Apex, base-left and base-right corners.
    pub fn vertices(&self) -> [Point; 3] {
        let axis = self.axis();
        let across = Vec2::new(-axis.y, axis.x) * (self.width / 2.0);
        let (apex, base) = match self.anchor {
            HeadAnchor::Tip => (self.position, self.position - axis * self.height),
            HeadAnchor::Base => (self.position + axis * self.height, self.position),
        };
        [apex, base - across, base + across]
    }

    /// Apex point.
    pub fn tip(&self) -> Point {
        self.vertices()[0]
    }
}

/// Clockwise angle in degrees (0 = up) of the direction `from` → `to`.
pub fn heading_degrees(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees() + 90.0
}

fn sign(p1: Point, p2: Point, p3: Point) -> f64 {
    (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y)
}

impl ShapeTrait for Arrowhead {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        let [a, b, c] = self.vertices();
        Rect::from_points(a, b).union_pt(c)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let [a, b, c] = self.vertices();
        let d1 = sign(point, a, b);
        let d2 = sign(point, b, c);
        let d3 = sign(point, c, a);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        if !(has_neg && has_pos) {
            return true;
        }
        [(a, b), (b, c), (c, a)]
            .iter()
            .any(|&(p, q)| point_to_segment_dist(point, p, q) <= tolerance)
    }

    fn to_path(&self) -> BezPath {
        let [a, b, c] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(a);
        path.line_to(b);
        path.line_to(c);
        path.close_path();
        path
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
        self.position = affine * self.position;
    }
}
