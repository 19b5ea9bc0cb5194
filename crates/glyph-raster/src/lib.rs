//! Backend-agnostic glyph rasterization for `glyph-atlas`.
//!
//! # Design goals
//! - **Atlas-agnostic**: no packing, no atlas buffers, no renderer types.
//! - **Practical**: produces CPU-side coverage bitmaps plus the bearings and advance a
//!   layout needs.
//! - **Swappable**: the atlas builder only sees [`OutlineRasterizer`].
//!
//! # Implementations
//! - [`swash_raster::SwashRasterizer`] (feature `swash`, default) parses TrueType/OpenType bytes
//!   and scan-converts outlines, with independent horizontal and vertical oversampling.
//! - [`DebugFont`] is a tiny procedural stroke font. It needs no font file, which makes it
//!   the rasterizer of choice for tests and fallbacks.

mod debug_font;

#[cfg(feature = "swash")]
pub mod swash_raster;

pub use debug_font::{DebugFont, DebugFontMetrics};

/// Input describing one rasterization request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RasterRequest {
    /// Character to rasterize.
    pub ch: char,
    /// Font size in pixels per em, before oversampling.
    pub font_px: f32,
    /// Horizontal and vertical oversampling factors (both >= 1).
    pub oversample: [u32; 2],
}

impl RasterRequest {
    pub const fn new(ch: char, font_px: f32, oversample: [u32; 2]) -> Self {
        Self {
            ch,
            font_px,
            oversample,
        }
    }
}

/// CPU-side glyph coverage bitmap suitable for uploading into an `R8` atlas.
///
/// Sizes and bearings are expressed in *oversampled* pixels; the advance is not.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBitmap {
    pub ch: char,
    /// Bitmap dimensions in pixels: (width, height).
    pub size_px: [u32; 2],
    /// Bearing (left, top) from the pen position to the bitmap's top-left corner.
    ///
    /// Coordinate convention:
    /// - x grows right
    /// - y grows down (so glyphs above the baseline have a negative top)
    pub bearing_px: [i32; 2],
    /// Horizontal pen advance in un-oversampled pixels.
    pub advance_px: f32,
    /// Row-major coverage bytes (0..=255), length = `width * height`.
    pub pixels: Vec<u8>,
}

impl GlyphBitmap {
    /// A glyph with no visible pixels (e.g. space) that still advances the pen.
    pub fn empty(ch: char, advance_px: f32) -> Self {
        Self {
            ch,
            size_px: [0, 0],
            bearing_px: [0, 0],
            advance_px,
            pixels: Vec::new(),
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.size_px[0]
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.size_px[1]
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size_px[0] == 0 || self.size_px[1] == 0
    }

    /// Row `y` of the coverage bitmap.
    ///
    /// Panics if `y` is out of bounds or if the pixel buffer is shorter than `width * height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.size_px[0] as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }
}

/// Errors reported by a rasterizer.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterError {
    /// The font bytes could not be parsed.
    InvalidFont(String),
    /// The font has no glyph for this character.
    MissingGlyph(char),
    /// The request itself cannot be satisfied (zero oversampling, bad size, ...).
    Malformed(String),
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::InvalidFont(msg) => write!(f, "Invalid font data: {}", msg),
            RasterError::MissingGlyph(ch) => {
                write!(f, "Font has no glyph for {:?} (U+{:04X})", ch, *ch as u32)
            }
            RasterError::Malformed(msg) => write!(f, "Malformed rasterization request: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {}

/// Result type for rasterization.
pub type RasterResult<T> = Result<T, RasterError>;

/// Something that turns characters into coverage bitmaps.
///
/// Implementations may keep internal scratch state, hence `&mut self`. Callers that share
/// a rasterizer between threads must serialize calls themselves.
pub trait OutlineRasterizer {
    /// Rasterize `req.ch` at `req.font_px`, oversampled by `req.oversample`.
    fn rasterize(&mut self, req: RasterRequest) -> RasterResult<GlyphBitmap>;
}

impl<R: OutlineRasterizer + ?Sized> OutlineRasterizer for &mut R {
    fn rasterize(&mut self, req: RasterRequest) -> RasterResult<GlyphBitmap> {
        (**self).rasterize(req)
    }
}

impl<R: OutlineRasterizer + ?Sized> OutlineRasterizer for Box<R> {
    fn rasterize(&mut self, req: RasterRequest) -> RasterResult<GlyphBitmap> {
        (**self).rasterize(req)
    }
}

/// Shared validation for requests: sizes must be finite and positive, oversampling >= 1.
pub fn check_request(req: &RasterRequest) -> RasterResult<()> {
    if !req.font_px.is_finite() || req.font_px <= 0.0 {
        return Err(RasterError::Malformed(format!(
            "font size must be positive, got {}",
            req.font_px
        )));
    }
    if req.oversample[0] == 0 || req.oversample[1] == 0 {
        return Err(RasterError::Malformed(format!(
            "oversampling must be at least 1x1, got {}x{}",
            req.oversample[0], req.oversample[1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_request_rejects_zero_oversample() {
        let req = RasterRequest::new('a', 16.0, [0, 1]);
        assert!(matches!(check_request(&req), Err(RasterError::Malformed(_))));
    }

    #[test]
    fn test_check_request_rejects_bad_size() {
        assert!(check_request(&RasterRequest::new('a', 0.0, [1, 1])).is_err());
        assert!(check_request(&RasterRequest::new('a', f32::NAN, [1, 1])).is_err());
        assert!(check_request(&RasterRequest::new('a', 12.0, [2, 3])).is_ok());
    }

    #[test]
    fn test_empty_bitmap() {
        let glyph = GlyphBitmap::empty(' ', 7.5);
        assert!(glyph.is_empty());
        assert_eq!(glyph.advance_px, 7.5);
        assert!(glyph.pixels.is_empty());
    }

    #[test]
    fn test_missing_glyph_message() {
        let msg = RasterError::MissingGlyph('A').to_string();
        assert!(msg.contains("U+0041"));
    }
}
