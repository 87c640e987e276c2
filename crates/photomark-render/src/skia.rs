//! tiny-skia rasterizer for annotation scenes.

use crate::renderer::{PixelBuffer, RenderConfig, RenderResult, RendererError, encode_png};
use kurbo::{Affine, BezPath, PathEl, Rect, Shape as _, Size, Vec2};
use photomark_core::shapes::{LINE_HEIGHT, Textbox};
use photomark_core::{SerializableColor, Shape, ShapeStyle, SnapshotError, SnapshotRenderer};
use rusttype::{Font, Scale, point as rt_point};
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// CPU renderer for annotation layers.
pub struct SkiaRenderer {
    config: RenderConfig,
    font: Option<Font<'static>>,
}

impl std::fmt::Debug for SkiaRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkiaRenderer")
            .field("background", &self.config.background)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self {
            config: RenderConfig::default(),
            font: None,
        }
    }
}

impl SkiaRenderer {
    /// Create a renderer, parsing the configured font if any.
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        let font = match &config.font_data {
            Some(data) => Some(
                Font::try_from_vec(data.clone())
                    .ok_or_else(|| RendererError::InitFailed("font data is not a usable TrueType font".into()))?,
            ),
            None => None,
        };
        Ok(Self { config, font })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Rasterize `objects` in paint order onto a `size` layer at `scale`.
    pub fn render_pixels(&self, objects: &[Shape], size: Size, scale: f64) -> RenderResult<PixelBuffer> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RendererError::RenderFailed(format!("invalid scale {scale}")));
        }
        let width = (size.width * scale).round().max(1.0) as u32;
        let height = (size.height * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RendererError::RenderFailed(format!("cannot allocate {width}x{height} layer")))?;

        let bg = self.config.background.to_rgba8();
        if bg.a > 0 {
            pixmap.fill(tiny_skia::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
        }

        for shape in objects {
            self.render_shape(&mut pixmap, shape, Vec2::ZERO, scale);
        }

        let rgba_data = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(PixelBuffer {
            rgba_data,
            width,
            height,
        })
    }

    /// Rasterize and encode as PNG.
    pub fn export_png(&self, objects: &[Shape], size: Size, scale: f64) -> RenderResult<Vec<u8>> {
        let pixels = self.render_pixels(objects, size, scale)?;
        let png = encode_png(&pixels)?;
        log::debug!(
            "Encoded {}x{} layer with {} objects: {} bytes",
            pixels.width,
            pixels.height,
            objects.len(),
            png.len()
        );
        Ok(png)
    }

    fn render_shape(&self, pixmap: &mut Pixmap, shape: &Shape, offset: Vec2, scale: f64) {
        match shape {
            Shape::Group(group) => {
                for child in group.children() {
                    self.render_shape(pixmap, child, offset + group.offset, scale);
                }
            }
            Shape::Textbox(text) => self.render_text(pixmap, text, offset, scale),
            other => {
                let transform = Affine::scale(scale) * Affine::translate(offset);
                render_path(pixmap, &(transform * other.to_path()), other.style(), scale);
            }
        }
    }

    fn render_text(&self, pixmap: &mut Pixmap, text: &Textbox, offset: Vec2, scale: f64) {
        let transform = Affine::scale(scale) * Affine::translate(offset);
        if let Some(background) = text.background {
            let rect = Rect::from_origin_size(text.position, (text.width, text.height()));
            let rect = transform.transform_rect_bbox(rect);
            if let Some(path) = to_skia_path(&rect.to_path(0.1)) {
                pixmap.fill_path(&path, &paint_for(background), FillRule::Winding, Transform::identity(), None);
            }
        }

        let Some(font) = &self.font else {
            return;
        };
        let size = (text.font_size * scale) as f32;
        let glyph_scale = Scale::uniform(size);
        let ascent = font.v_metrics(glyph_scale).ascent;
        let origin = transform * text.position;
        let line_advance = text.font_size * LINE_HEIGHT * scale;
        let color = text.color();

        for (i, line) in text.content.split('\n').enumerate() {
            let baseline = rt_point(origin.x as f32, (origin.y + i as f64 * line_advance) as f32 + ascent);
            for glyph in font.layout(line, glyph_scale, baseline) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    blend_coverage(pixmap, gx as i32 + bb.min.x, gy as i32 + bb.min.y, color, coverage);
                });
            }
        }
    }
}

impl SnapshotRenderer for SkiaRenderer {
    fn render_png(&mut self, objects: &[Shape], size: Size, scale: f64) -> Result<Vec<u8>, SnapshotError> {
        Ok(self.export_png(objects, size, scale)?)
    }
}

/// Fill then stroke a path already in pixel space.
fn render_path(pixmap: &mut Pixmap, path: &BezPath, style: &ShapeStyle, scale: f64) {
    let Some(skia_path) = to_skia_path(path) else {
        return;
    };
    if let Some(fill) = style.fill_color {
        pixmap.fill_path(&skia_path, &paint_for(fill), FillRule::Winding, Transform::identity(), None);
    }
    if style.stroke_width > 0.0 {
        let stroke = Stroke {
            width: (style.stroke_width * scale) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        pixmap.stroke_path(&skia_path, &paint_for(style.stroke_color), &stroke, Transform::identity(), None);
    }
}

fn paint_for(color: SerializableColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Convert a kurbo path to tiny-skia. `None` for empty or degenerate paths.
fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Source-over blend of one glyph coverage sample into premultiplied pixels.
fn blend_coverage(pixmap: &mut Pixmap, x: i32, y: i32, color: SerializableColor, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let alpha = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }
    let idx = ((y as u32 * pixmap.width() + x as u32) * 4) as usize;
    let data = pixmap.data_mut();
    let src = [color.r, color.g, color.b, 255];
    for (channel, value) in src.into_iter().enumerate() {
        let dst = f32::from(data[idx + channel]);
        data[idx + channel] = (f32::from(value) * alpha + dst * (1.0 - alpha)).round() as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use photomark_core::shapes::{Arrowhead, CompositeKind, Group, HeadAnchor, Line, Rectangle};

    const RED: SerializableColor = SerializableColor {
        r: 220,
        g: 38,
        b: 38,
        a: 255,
    };

    fn red_line(from: (f64, f64), to: (f64, f64)) -> Shape {
        Shape::Line(
            Line::new(Point::new(from.0, from.1), Point::new(to.0, to.1)).with_style(ShapeStyle::stroked(RED, 3.0)),
        )
    }

    #[test]
    fn test_empty_layer_is_transparent() {
        let renderer = SkiaRenderer::default();
        let pixels = renderer.render_pixels(&[], Size::new(40.0, 30.0), 1.0).unwrap();
        assert_eq!((pixels.width, pixels.height), (40, 30));
        assert_eq!(pixels.painted_pixels(), 0);
    }

    #[test]
    fn test_line_is_painted() {
        let renderer = SkiaRenderer::default();
        let pixels = renderer
            .render_pixels(&[red_line((0.0, 10.0), (100.0, 10.0))], Size::new(100.0, 20.0), 1.0)
            .unwrap();
        assert_eq!(pixels.pixel(50, 10), Some([220, 38, 38, 255]));
        assert_eq!(pixels.pixel(50, 2).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_scale_multiplies_dimensions() {
        let renderer = SkiaRenderer::default();
        let pixels = renderer
            .render_pixels(&[red_line((0.0, 10.0), (100.0, 10.0))], Size::new(100.0, 20.0), 2.0)
            .unwrap();
        assert_eq!((pixels.width, pixels.height), (200, 40));
        assert_eq!(pixels.pixel(100, 20).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_invalid_scale_fails() {
        let renderer = SkiaRenderer::default();
        let result = renderer.render_pixels(&[], Size::new(10.0, 10.0), 0.0);
        assert!(matches!(result, Err(RendererError::RenderFailed(_))));
    }

    #[test]
    fn test_group_offset_is_applied() {
        let head = Arrowhead::new(Point::new(20.0, 20.0), 10.0, 10.0, 180.0, HeadAnchor::Tip)
            .with_style(ShapeStyle::filled(RED));
        let mut group = Group::new(vec![red_line((20.0, 0.0), (20.0, 20.0)), Shape::Arrowhead(head)])
            .with_kind(CompositeKind::Arrow);
        group.offset = Vec2::new(40.0, 0.0);

        let renderer = SkiaRenderer::default();
        let pixels = renderer
            .render_pixels(&[Shape::Group(group)], Size::new(100.0, 40.0), 1.0)
            .unwrap();
        assert_eq!(pixels.pixel(20, 10).map(|p| p[3]), Some(0));
        assert_eq!(pixels.pixel(60, 10), Some([220, 38, 38, 255]));
    }

    #[test]
    fn test_degenerate_rectangle_does_not_fail() {
        let rect = Rectangle::from_corners(Point::new(5.0, 5.0), Point::new(5.0, 5.0))
            .with_style(ShapeStyle::stroked(RED, 3.0));
        let renderer = SkiaRenderer::default();
        assert!(
            renderer
                .render_pixels(&[Shape::Rectangle(rect)], Size::new(10.0, 10.0), 1.0)
                .is_ok()
        );
    }

    #[test]
    fn test_text_background_without_font() {
        let label = Textbox::new(Point::new(10.0, 10.0), "Note...", RED)
            .with_width(50.0)
            .with_background(Some(SerializableColor::new(0, 0, 255, 255)));
        let renderer = SkiaRenderer::default();
        let pixels = renderer
            .render_pixels(&[Shape::Textbox(label)], Size::new(100.0, 50.0), 1.0)
            .unwrap();
        assert_eq!(pixels.pixel(30, 15), Some([0, 0, 255, 255]));
        assert_eq!(pixels.pixel(5, 5).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_bad_font_is_rejected() {
        let result = SkiaRenderer::new(RenderConfig::new().with_font(vec![0, 1, 2, 3]));
        assert!(matches!(result, Err(RendererError::InitFailed(_))));
    }

    #[test]
    fn test_background_fills_layer() {
        let config = RenderConfig::new().with_background(peniko::Color::from_rgba8(255, 255, 255, 255));
        let renderer = SkiaRenderer::new(config).unwrap();
        let pixels = renderer.render_pixels(&[], Size::new(4.0, 4.0), 1.0).unwrap();
        assert_eq!(pixels.painted_pixels(), 16);
    }

    #[test]
    fn test_snapshot_renderer_emits_png() {
        let mut renderer = SkiaRenderer::default();
        let png = SnapshotRenderer::render_png(
            &mut renderer,
            &[red_line((0.0, 0.0), (10.0, 10.0))],
            Size::new(16.0, 16.0),
            1.0,
        )
        .unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }
}
