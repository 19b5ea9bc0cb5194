//! `swash` implementation of outline rasterization.
//!
//! Owns the raw font bytes and hands out transient `FontRef`s, so the rasterizer can be
//! stored and moved freely. Outlines are scaled to the requested em size and then
//! stretched by the oversampling factors before scan conversion.
//!
//! Hinting is disabled: oversampled bitmaps are meant to be filtered down by the
//! renderer, and hinting at the oversampled resolution would snap to the wrong grid.

use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::{Format, Transform};
use swash::{CacheKey, FontRef};

use crate::{check_request, GlyphBitmap, OutlineRasterizer, RasterError, RasterRequest, RasterResult};

/// Rasterizer over a single TrueType/OpenType face.
pub struct SwashRasterizer {
    /// Raw font file bytes.
    bytes: Vec<u8>,
    /// Byte offset to the face's table directory (from `FontRef::from_index`).
    offset: u32,
    /// Identifies the face to `ScaleContext`'s internal caches.
    cache_key: CacheKey,
    scale_context: ScaleContext,
}

impl SwashRasterizer {
    /// Parse `bytes` as a font file and use its first face.
    pub fn from_bytes(bytes: Vec<u8>) -> RasterResult<Self> {
        Self::from_index(bytes, 0)
    }

    /// Parse `bytes` as a font file (or collection) and use face `index`.
    pub fn from_index(bytes: Vec<u8>, index: usize) -> RasterResult<Self> {
        let (offset, cache_key) = {
            let font = FontRef::from_index(&bytes, index).ok_or_else(|| {
                RasterError::InvalidFont(format!(
                    "no face {} in {} bytes of font data",
                    index,
                    bytes.len()
                ))
            })?;
            (font.offset, font.key)
        };

        log::debug!(
            "Loaded font face {} ({} bytes, table offset {})",
            index,
            bytes.len(),
            offset
        );

        Ok(Self {
            bytes,
            offset,
            cache_key,
            scale_context: ScaleContext::new(),
        })
    }

    /// The raw font bytes this rasterizer was created from.
    pub fn font_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.bytes,
            offset: self.offset,
            key: self.cache_key,
        }
    }

    /// Whether the face maps `ch` to a real glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.font_ref().charmap().map(ch) != 0
    }
}

impl std::fmt::Debug for SwashRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwashRasterizer")
            .field("bytes", &self.bytes.len())
            .field("offset", &self.offset)
            .finish()
    }
}

impl OutlineRasterizer for SwashRasterizer {
    fn rasterize(&mut self, req: RasterRequest) -> RasterResult<GlyphBitmap> {
        check_request(&req)?;

        let font = FontRef {
            data: &self.bytes,
            offset: self.offset,
            key: self.cache_key,
        };

        let glyph_id = font.charmap().map(req.ch);
        if glyph_id == 0 {
            return Err(RasterError::MissingGlyph(req.ch));
        }

        let advance_px = font
            .glyph_metrics(&[])
            .scale(req.font_px)
            .advance_width(glyph_id);

        let mut scaler = self
            .scale_context
            .builder(font)
            .size(req.font_px)
            .hint(false)
            .build();

        let oversample = Transform::scale(req.oversample[0] as f32, req.oversample[1] as f32);

        // Glyphs without an outline (space, most control-like glyphs) render to nothing.
        let Some(image) = Render::new(&[Source::Outline])
            .format(Format::Alpha)
            .transform(Some(oversample))
            .render(&mut scaler, glyph_id)
        else {
            return Ok(GlyphBitmap::empty(req.ch, advance_px));
        };

        let w = image.placement.width;
        let h = image.placement.height;
        if w == 0 || h == 0 {
            return Ok(GlyphBitmap::empty(req.ch, advance_px));
        }

        // Swash placement: `left` is the x offset to the bitmap's left edge, `top` is the
        // distance from the baseline up to its top edge. Our convention is y-down.
        Ok(GlyphBitmap {
            ch: req.ch,
            size_px: [w, h],
            bearing_px: [image.placement.left, -image.placement.top],
            advance_px,
            pixels: image.data,
        })
    }
}
