//! Renderer configuration, pixel output and PNG encoding.

use peniko::Color;
use photomark_core::SnapshotError;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

impl From<RendererError> for SnapshotError {
    fn from(err: RendererError) -> Self {
        SnapshotError::Render(err.to_string())
    }
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Settings for a snapshot render.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Layer background. Transparent so the layer composites over the photo.
    pub background: Color,
    /// TrueType/OpenType bytes used to rasterize textbox glyphs.
    /// Without a font only textbox backgrounds are painted.
    pub font_data: Option<Vec<u8>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::from_rgba8(0, 0, 0, 0),
            font_data: None,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Set the font used for text.
    pub fn with_font(mut self, data: Vec<u8>) -> Self {
        self.font_data = Some(data);
        self
    }
}

/// Straight-alpha RGBA pixels of a rendered layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// RGBA pixel data (4 bytes per pixel, row-major).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl PixelBuffer {
    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.rgba_data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with any coverage.
    pub fn painted_pixels(&self) -> usize {
        self.rgba_data.chunks_exact(4).filter(|px| px[3] > 0).count()
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(pixels: &PixelBuffer) -> RenderResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixels.width, pixels.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels.rgba_data)?;
        writer.finish()?;
    }
    Ok(png_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_signature() {
        let pixels = PixelBuffer {
            rgba_data: vec![255, 0, 0, 255, 0, 0, 0, 0],
            width: 2,
            height: 1,
        };
        let png = encode_png(&pixels).unwrap();
        assert_eq!(&png[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let pixels = PixelBuffer {
            rgba_data: vec![0; 4],
            width: 2,
            height: 2,
        };
        assert!(matches!(encode_png(&pixels), Err(RendererError::Encode(_))));
    }

    #[test]
    fn test_pixel_lookup() {
        let pixels = PixelBuffer {
            rgba_data: vec![1, 2, 3, 4, 5, 6, 7, 8],
            width: 2,
            height: 1,
        };
        assert_eq!(pixels.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(pixels.pixel(2, 0), None);
        assert_eq!(pixels.painted_pixels(), 2);
    }

    #[test]
    fn test_error_maps_to_snapshot_error() {
        let err: SnapshotError = RendererError::RenderFailed("empty".into()).into();
        assert!(matches!(err, SnapshotError::Render(msg) if msg.contains("empty")));
    }
}
