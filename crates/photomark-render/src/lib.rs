//! Photomark Render Library
//!
//! Rasterizes an annotation scene onto a transparent layer and encodes it as
//! PNG. The default implementation draws on the CPU with tiny-skia.

mod renderer;
mod skia;

pub use renderer::{PixelBuffer, RenderConfig, RenderResult, RendererError, encode_png};
pub use skia::SkiaRenderer;
