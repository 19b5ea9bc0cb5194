//! Atlas construction: rasterize a character range, pack it, blit it.
//!
//! The whole range is rasterized before anything is packed so the packer sees every
//! size at once and can order the batch globally. Any failure aborts the build; there is
//! no partially filled atlas.

use std::collections::HashMap;

use glyph_raster::{GlyphBitmap, OutlineRasterizer, RasterError, RasterRequest};

use crate::{
    Atlas, AtlasConfig, AtlasError, AtlasPx, AtlasRectPx, AtlasResult, GlyphMetrics, PackedRect,
    RectPacker,
};

/// Builds an [`Atlas`] from an [`AtlasConfig`].
#[derive(Clone, Debug, Default)]
pub struct AtlasBuilder {
    config: AtlasConfig,
}

impl AtlasBuilder {
    pub fn new(config: AtlasConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Rasterize, pack and copy every glyph of the configured range.
    pub fn build<R: OutlineRasterizer + ?Sized>(&self, rasterizer: &mut R) -> AtlasResult<Atlas> {
        let config = &self.config;
        config.validate()?;

        let bitmaps = self.rasterize_all(rasterizer)?;

        // Padding goes to the right and bottom so neighbouring glyphs never touch.
        let pad = config.padding_px;
        let sizes: Vec<[u32; 2]> = bitmaps
            .iter()
            .map(|b| {
                if b.is_empty() {
                    [0, 0]
                } else {
                    [b.width() + pad, b.height() + pad]
                }
            })
            .collect();

        let [width, height] = config.size_px;
        let placements = RectPacker::new(width, height)
            .pack(&sizes)
            .map_err(|mut err| {
                if let AtlasError::PackingExhausted { index, ch, .. } = &mut err {
                    *ch = bitmaps.get(*index).map(|b| b.ch);
                }
                log::warn!("Glyph atlas packing failed: {}", err);
                err
            })?;
        log::debug!("Packed {} glyphs into {}x{}", placements.len(), width, height);

        let mut pixels = vec![0u8; width as usize * height as usize];
        let mut glyphs = HashMap::with_capacity(bitmaps.len());
        for (bitmap, placed) in bitmaps.iter().zip(&placements) {
            let atlas_rect = blit(&mut pixels, width, bitmap, *placed);
            glyphs.insert(bitmap.ch, self.metrics_for(bitmap, atlas_rect));
        }

        let atlas = Atlas::from_parts(
            config.size_px,
            pixels,
            config.range,
            config.font_px,
            config.oversample,
            glyphs,
        );

        log::info!(
            "Built glyph atlas: {} glyphs at {}px ({}x{} oversampling), {}x{} canvas, {:.1}% used",
            atlas.len(),
            config.font_px,
            config.oversample[0],
            config.oversample[1],
            width,
            height,
            atlas.occupancy() * 100.0
        );

        Ok(atlas)
    }

    fn rasterize_all<R: OutlineRasterizer + ?Sized>(
        &self,
        rasterizer: &mut R,
    ) -> AtlasResult<Vec<GlyphBitmap>> {
        let config = &self.config;
        let mut bitmaps = Vec::with_capacity(config.range.len());

        for ch in config.range.chars() {
            let failed = |source: RasterError| AtlasError::RasterizationFailed {
                ch,
                font_px: config.font_px,
                source,
            };

            let mut bitmap = rasterizer
                .rasterize(RasterRequest::new(ch, config.font_px, config.oversample))
                .map_err(failed)?;

            let expected = bitmap.width() as usize * bitmap.height() as usize;
            if bitmap.pixels.len() != expected {
                return Err(failed(RasterError::Malformed(format!(
                    "{}x{} bitmap carries {} bytes",
                    bitmap.width(),
                    bitmap.height(),
                    bitmap.pixels.len()
                ))));
            }

            // Rasterizers answer for the character they were asked about.
            bitmap.ch = ch;
            bitmaps.push(bitmap);
        }

        let empty = bitmaps.iter().filter(|b| b.is_empty()).count();
        if empty == bitmaps.len() {
            log::warn!(
                "Every glyph in {:?}..{:?} rasterized empty",
                config.range.start,
                config.range.end
            );
        }
        log::debug!("Rasterized {} glyphs ({} empty)", bitmaps.len(), empty);

        Ok(bitmaps)
    }

    /// Convert oversampled bitmap bearings into un-oversampled quad offsets.
    fn metrics_for(&self, bitmap: &GlyphBitmap, atlas_rect: AtlasRectPx) -> GlyphMetrics {
        let [ox, oy] = self.config.oversample;
        let (ox, oy) = (ox as f32, oy as f32);

        let left = bitmap.bearing_px[0] as f32;
        let top = bitmap.bearing_px[1] as f32;
        let w = atlas_rect.width() as f32;
        let h = atlas_rect.height() as f32;

        GlyphMetrics {
            atlas_rect,
            offset: [left / ox, top / oy],
            offset2: [(left + w) / ox, (top + h) / oy],
            advance: bitmap.advance_px,
        }
    }
}

/// Copy `bitmap` into the atlas at `placed`. Returns the glyph's rect (padding excluded).
fn blit(pixels: &mut [u8], stride: u32, bitmap: &GlyphBitmap, placed: PackedRect) -> AtlasRectPx {
    let origin = AtlasPx::new(placed.x, placed.y);
    if bitmap.is_empty() {
        return AtlasRectPx::new(origin, [0, 0]);
    }

    let w = bitmap.width() as usize;
    for row in 0..bitmap.height() {
        let dst = (placed.y + row) as usize * stride as usize + placed.x as usize;
        pixels[dst..dst + w].copy_from_slice(bitmap.row(row));
    }

    AtlasRectPx::new(origin, bitmap.size_px)
}

/// Build an atlas for `config` using `rasterizer`.
pub fn build_atlas<R: OutlineRasterizer + ?Sized>(
    rasterizer: &mut R,
    config: AtlasConfig,
) -> AtlasResult<Atlas> {
    AtlasBuilder::new(config).build(rasterizer)
}
