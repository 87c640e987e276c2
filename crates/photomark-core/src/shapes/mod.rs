//! Scene objects: primitives and the composite groups built from them.

mod arrowhead;
mod ellipse;
mod group;
mod line;
mod path;
mod rectangle;
mod textbox;

pub use arrowhead::{Arrowhead, HeadAnchor, heading_degrees};
pub use ellipse::Ellipse;
pub use group::{CompositeKind, Group};
pub use line::Line;
pub use path::{CLOUD_SAMPLES, CloudPath, PathCommand};
pub use rectangle::Rectangle;
pub use textbox::{LINE_HEIGHT, Textbox};

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Error returned when a CSS color string cannot be understood.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Unsupported color syntax: {0}")]
    Syntax(String),
    #[error("Invalid color component in {0}")]
    Component(String),
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS color as the toolbar hands it over.
    ///
    /// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
    /// `rgba(r, g, b, a)` (alpha in `0..=1`) and `transparent`.
    pub fn from_css(input: &str) -> Result<Self, ColorParseError> {
        let color = input.trim();
        if color.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }

        if let Some(hex) = color.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(ColorParseError::Component(input.to_string()));
            }
            let channel = |s: &str| {
                u8::from_str_radix(s, 16).map_err(|_| ColorParseError::Component(input.to_string()))
            };
            return match hex.len() {
                3 => {
                    let r = channel(&hex[0..1])? * 17;
                    let g = channel(&hex[1..2])? * 17;
                    let b = channel(&hex[2..3])? * 17;
                    Ok(Self::new(r, g, b, 255))
                }
                6 => Ok(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    255,
                )),
                8 => Ok(Self::new(
                    channel(&hex[0..2])?,
                    channel(&hex[2..4])?,
                    channel(&hex[4..6])?,
                    channel(&hex[6..8])?,
                )),
                _ => Err(ColorParseError::Syntax(input.to_string())),
            };
        }

        let lower = color.to_ascii_lowercase();
        let (body, has_alpha) = if let Some(body) = lower.strip_prefix("rgba(") {
            (body, true)
        } else if let Some(body) = lower.strip_prefix("rgb(") {
            (body, false)
        } else {
            return Err(ColorParseError::Syntax(input.to_string()));
        };
        let body = body
            .strip_suffix(')')
            .ok_or_else(|| ColorParseError::Syntax(input.to_string()))?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(ColorParseError::Syntax(input.to_string()));
        }

        let mut rgb = [0u8; 3];
        for (slot, part) in rgb.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| ColorParseError::Component(input.to_string()))?;
        }
        let a = if has_alpha {
            let alpha: f64 = parts[3]
                .parse()
                .map_err(|_| ColorParseError::Component(input.to_string()))?;
            if !(0.0..=1.0).contains(&alpha) {
                return Err(ColorParseError::Component(input.to_string()));
            }
            (alpha * 255.0).round() as u8
        } else {
            255
        };
        Ok(Self::new(rgb[0], rgb[1], rgb[2], a))
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Paint properties of a primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width (0 = no outline).
    pub stroke_width: f64,
    /// Fill color (None = transparent).
    #[serde(default)]
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// An outline-only style, the default for drawn shapes.
    pub fn stroked(color: SerializableColor, width: f64) -> Self {
        Self {
            stroke_color: color,
            stroke_width: width,
            fill_color: None,
        }
    }

    /// A fill-only style (arrowheads, text glyphs).
    pub fn filled(color: SerializableColor) -> Self {
        Self {
            stroke_color: color,
            stroke_width: 0.0,
            fill_color: Some(color),
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::stroked(SerializableColor::black(), 3.0)
    }
}

/// Whether an object takes part in hit-testing and direct manipulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub selectable: bool,
    pub evented: bool,
}

impl Interaction {
    /// Fully interactive.
    pub const LIVE: Self = Self {
        selectable: true,
        evented: true,
    };
    /// Inert: ignored by hit-testing.
    pub const INERT: Self = Self {
        selectable: false,
        evented: false,
    };

    pub fn is_live(&self) -> bool {
        self.selectable && self.evented
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => (*only - point).hypot(),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// Common trait for all scene objects.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in surface coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Hit-testing and manipulation flags.
    fn interaction(&self) -> Interaction;

    /// Set hit-testing and manipulation flags.
    fn set_interaction(&mut self, interaction: Interaction);

    /// Apply a transform to this shape's geometry.
    fn transform(&mut self, affine: Affine);
}

/// Enum wrapper for all object types (for serialization and storage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    Line(Line),
    Arrowhead(Arrowhead),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Path(CloudPath),
    Textbox(Textbox),
    Group(Group),
}

macro_rules! each_shape {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Line($s) => $body,
            Shape::Arrowhead($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Path($s) => $body,
            Shape::Textbox($s) => $body,
            Shape::Group($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        each_shape!(self, s => s.id())
    }

    pub fn bounds(&self) -> Rect {
        each_shape!(self, s => s.bounds())
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        each_shape!(self, s => s.hit_test(point, tolerance))
    }

    pub fn to_path(&self) -> BezPath {
        each_shape!(self, s => s.to_path())
    }

    pub fn style(&self) -> &ShapeStyle {
        each_shape!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        each_shape!(self, s => s.style_mut())
    }

    pub fn interaction(&self) -> Interaction {
        each_shape!(self, s => s.interaction())
    }

    pub fn set_interaction(&mut self, interaction: Interaction) {
        each_shape!(self, s => s.set_interaction(interaction))
    }

    pub fn transform(&mut self, affine: Affine) {
        each_shape!(self, s => s.transform(affine))
    }

    /// Move the object by `delta`. Groups only shift their offset.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Group(g) => g.offset += delta,
            other => other.transform(Affine::translate(delta)),
        }
    }

    /// Short type name, as used in the serialized form.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Line(_) => "line",
            Shape::Arrowhead(_) => "arrowhead",
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Path(_) => "path",
            Shape::Textbox(_) => "textbox",
            Shape::Group(_) => "group",
        }
    }

    /// Check if this shape is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Shape::Group(_))
    }

    /// Get the group if this shape is a group.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Shape::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Composite marker, if this is a tagged group.
    pub fn custom_type(&self) -> Option<CompositeKind> {
        self.as_group().and_then(|g| g.custom_type)
    }

    /// Get the textbox if this shape is one.
    pub fn as_textbox(&self) -> Option<&Textbox> {
        match self {
            Shape::Textbox(t) => Some(t),
            _ => None,
        }
    }

    /// Get the mutable textbox if this shape is one.
    pub fn as_textbox_mut(&mut self) -> Option<&mut Textbox> {
        match self {
            Shape::Textbox(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(
            SerializableColor::from_css("#DC2626"),
            Ok(SerializableColor::new(0xDC, 0x26, 0x26, 255))
        );
        assert_eq!(
            SerializableColor::from_css("#fff"),
            Ok(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_css("#00000080"),
            Ok(SerializableColor::new(0, 0, 0, 128))
        );
    }

    #[test]
    fn test_parse_rgba() {
        assert_eq!(
            SerializableColor::from_css("rgba(0, 0, 0, 0.1)"),
            Ok(SerializableColor::new(0, 0, 0, 26))
        );
        assert_eq!(
            SerializableColor::from_css("rgb(10,20,30)"),
            Ok(SerializableColor::new(10, 20, 30, 255))
        );
        assert_eq!(
            SerializableColor::from_css("transparent"),
            Ok(SerializableColor::transparent())
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SerializableColor::from_css("red").is_err());
        assert!(SerializableColor::from_css("#12345").is_err());
        assert!(SerializableColor::from_css("#zzzzzz").is_err());
        assert!(SerializableColor::from_css("#\u{e9}\u{e9}\u{e9}").is_err());
        assert!(SerializableColor::from_css("rgba(0,0,0,2)").is_err());
    }

    #[test]
    fn test_css_round_trip_format() {
        let c = SerializableColor::new(0xDC, 0x26, 0x26, 255);
        assert_eq!(c.to_css(), "#DC2626");
    }

    #[test]
    fn test_shape_serializes_with_type_tag() {
        let shape = Shape::Line(Line::new(Point::new(0.0, 0.0), Point::new(1.0, 1.0)));
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["type"], "line");
    }

    #[test]
    fn test_polyline_distance_single_point() {
        let d = point_to_polyline_dist(Point::new(3.0, 4.0), &[Point::ZERO]);
        assert!((d - 5.0).abs() < f64::EPSILON);
    }
}
