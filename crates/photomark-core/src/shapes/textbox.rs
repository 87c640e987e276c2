//! Textbox shape.

use super::{Interaction, SerializableColor, ShapeId, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.16;

/// A fixed-width block of wrapped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Textbox {
    pub(crate) id: ShapeId,
    /// Top-left corner of the box.
    pub position: Point,
    /// The text content.
    pub content: String,
    /// Box width; height follows the line count.
    pub width: f64,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_family: String,
    /// Glyph color lives in `style.fill_color`.
    pub style: ShapeStyle,
    /// Box background (None = transparent).
    #[serde(default)]
    pub background: Option<SerializableColor>,
    /// Whether the box may enter edit mode.
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub interaction: Interaction,
}

impl Textbox {
    /// Create a new textbox with the given glyph color.
    pub fn new(position: Point, content: impl Into<String>, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: content.into(),
            width: 200.0,
            font_size: 16.0,
            font_family: "Arial".to_string(),
            style: ShapeStyle::filled(color),
            background: None,
            editable: true,
            interaction: Interaction::default(),
        }
    }

    /// Builder: set the box width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Builder: set font size and family.
    pub fn with_font(mut self, size: f64, family: impl Into<String>) -> Self {
        self.font_size = size;
        self.font_family = family.into();
        self
    }

    /// Builder: set the background.
    pub fn with_background(mut self, background: Option<SerializableColor>) -> Self {
        self.background = background;
        self
    }

    /// Number of rendered lines (at least one).
    pub fn line_count(&self) -> usize {
        self.content.split('\n').count().max(1)
    }

    /// Box height from the line count.
    pub fn height(&self) -> f64 {
        self.line_count() as f64 * self.font_size * LINE_HEIGHT
    }

    /// Text color.
    pub fn color(&self) -> SerializableColor {
        self.style.fill_color.unwrap_or(self.style.stroke_color)
    }
}

impl ShapeTrait for Textbox {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height(),
        )
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    fn to_path(&self) -> BezPath {
        // Box outline; glyphs are laid out by the renderer.
        self.bounds().to_path(0.1)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbox_creation() {
        let text = Textbox::new(Point::new(10.0, 20.0), "Type here...", SerializableColor::black());
        assert_eq!(text.content, "Type here...");
        assert!((text.width - 200.0).abs() < f64::EPSILON);
        assert_eq!(text.color(), SerializableColor::black());
    }

    #[test]
    fn test_height_follows_lines() {
        let mut text = Textbox::new(Point::ZERO, "", SerializableColor::black()).with_font(10.0, "Arial");
        assert_eq!(text.line_count(), 1);
        text.content = "a\nb\n".to_string();
        assert_eq!(text.line_count(), 3);
        assert!((text.height() - 34.8).abs() < 1e-9);
    }

    #[test]
    fn test_hit_test() {
        let text = Textbox::new(Point::new(0.0, 0.0), "Hi", SerializableColor::black()).with_width(120.0);
        assert!(text.hit_test(Point::new(100.0, 5.0), 0.0));
        assert!(!text.hit_test(Point::new(130.0, 5.0), 1.0));
    }
}
