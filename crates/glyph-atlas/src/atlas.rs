//! Atlas data model: the packed pixel buffer plus per-glyph placement and metrics.
//!
//! An [`Atlas`] is produced once by [`crate::AtlasBuilder`] and never mutated afterwards,
//! so it can be shared freely between threads for read-only queries.

use std::collections::HashMap;

use crate::{AtlasError, AtlasResult, GlyphRange};

/// Atlas coordinates in pixels (top-left origin).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasPx {
    pub x: u32,
    pub y: u32,
}

impl AtlasPx {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Rectangle in atlas pixel coordinates, `[x0, x1) x [y0, y1)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AtlasRectPx {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl AtlasRectPx {
    pub const fn new(min: AtlasPx, size: [u32; 2]) -> Self {
        Self {
            x0: min.x,
            y0: min.y,
            x1: min.x + size[0],
            y1: min.y + size[1],
        }
    }

    #[inline]
    pub const fn width(self) -> u32 {
        self.x1 - self.x0
    }

    #[inline]
    pub const fn height(self) -> u32 {
        self.y1 - self.y0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Whether the two rectangles share any area. Empty rectangles never overlap.
    pub const fn overlaps(self, other: AtlasRectPx) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x0 < other.x1
            && other.x0 < self.x1
            && self.y0 < other.y1
            && other.y0 < self.y1
    }

    /// Normalize by the atlas size.
    pub fn to_uv(self, atlas_width: u32, atlas_height: u32) -> UvRect {
        let inv_w = 1.0 / (atlas_width as f32);
        let inv_h = 1.0 / (atlas_height as f32);

        UvRect::new(
            [self.x0 as f32 * inv_w, self.y0 as f32 * inv_h],
            [self.x1 as f32 * inv_w, self.y1 as f32 * inv_h],
        )
    }
}

/// UV rectangle (normalized texture coords).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct UvRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvRect {
    pub const fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        Self { min, max }
    }
}

/// Placement and layout metrics for one glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Glyph bitmap bounds inside the atlas (padding excluded).
    pub atlas_rect: AtlasRectPx,
    /// Top-left quad corner relative to the pen, in un-oversampled pixels (y down).
    pub offset: [f32; 2],
    /// Bottom-right quad corner relative to the pen, in un-oversampled pixels (y down).
    pub offset2: [f32; 2],
    /// Horizontal pen advance in pixels.
    pub advance: f32,
}

/// A single-channel glyph atlas.
#[derive(Clone, Debug)]
pub struct Atlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    range: GlyphRange,
    font_px: f32,
    oversample: [u32; 2],
    glyphs: HashMap<char, GlyphMetrics>,
}

impl Atlas {
    /// Assemble an atlas from already packed parts.
    ///
    /// `pixels` must hold exactly `width * height` bytes and `glyphs` must cover `range`.
    pub(crate) fn from_parts(
        size_px: [u32; 2],
        pixels: Vec<u8>,
        range: GlyphRange,
        font_px: f32,
        oversample: [u32; 2],
        glyphs: HashMap<char, GlyphMetrics>,
    ) -> Self {
        debug_assert_eq!(pixels.len(), (size_px[0] as usize) * (size_px[1] as usize));
        debug_assert_eq!(glyphs.len(), range.len());

        Self {
            width: size_px[0],
            height: size_px[1],
            pixels,
            range,
            font_px,
            oversample,
            glyphs,
        }
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major alpha coverage, `width * height` bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel buffer (e.g. for a texture upload).
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    #[inline]
    pub const fn range(&self) -> GlyphRange {
        self.range
    }

    #[inline]
    pub const fn font_px(&self) -> f32 {
        self.font_px
    }

    #[inline]
    pub const fn oversample(&self) -> [u32; 2] {
        self.oversample
    }

    /// Number of glyphs in the atlas.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Metrics for `ch`, or [`AtlasError::GlyphOutOfRange`] if it was not built.
    pub fn glyph(&self, ch: char) -> AtlasResult<&GlyphMetrics> {
        if !self.range.contains(ch) {
            return Err(AtlasError::GlyphOutOfRange {
                ch,
                range: self.range,
            });
        }
        self.glyphs.get(&ch).ok_or(AtlasError::GlyphOutOfRange {
            ch,
            range: self.range,
        })
    }

    /// Iterate glyphs in ascending character order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, &GlyphMetrics)> + '_ {
        self.range
            .chars()
            .filter_map(move |ch| self.glyphs.get(&ch).map(|m| (ch, m)))
    }

    /// Coverage value at atlas pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width()` or `y >= height()`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels[(y as usize) * (self.width as usize) + x as usize]
    }

    /// Fraction of atlas pixels covered by glyph bitmaps.
    pub fn occupancy(&self) -> f32 {
        let used: u64 = self
            .glyphs
            .values()
            .map(|m| m.atlas_rect.width() as u64 * m.atlas_rect.height() as u64)
            .sum();
        used as f32 / (self.width as f32 * self.height as f32)
    }
}
