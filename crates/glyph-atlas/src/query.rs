//! Per-character quad queries.
//!
//! Queries are stateless: the caller owns the pen. Each call returns where to draw one
//! glyph and where the pen goes next. Only the horizontal pen moves; line breaking and
//! vertical layout belong to the caller.

use crate::{Atlas, AtlasResult, UvRect};

/// Screen-space rectangle in pixels (y down).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenRect {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// One glyph to draw: where on screen and where in the atlas texture.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphQuad {
    pub screen: ScreenRect,
    pub uv: UvRect,
}

impl GlyphQuad {
    /// Two triangles of `[x, y, s, t]`, ready for a `f32x4` vertex buffer.
    pub fn vertices(&self) -> [[f32; 4]; 6] {
        let [x0, y0] = self.screen.min;
        let [x1, y1] = self.screen.max;
        let [s0, t0] = self.uv.min;
        let [s1, t1] = self.uv.max;

        [
            [x1, y1, s1, t1],
            [x1, y0, s1, t0],
            [x0, y1, s0, t1],
            [x1, y0, s1, t0],
            [x0, y0, s0, t0],
            [x0, y1, s0, t1],
        ]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.screen.max[0] <= self.screen.min[0] || self.screen.max[1] <= self.screen.min[1]
    }
}

/// Quads for a single line of text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineQuads {
    /// One quad per character, including invisible ones (their quads are empty).
    pub quads: Vec<GlyphQuad>,
    /// Pen x after the last character.
    pub pen_x: f32,
}

impl Atlas {
    /// Quad for `ch` drawn at the pen, and the advanced pen x.
    ///
    /// The pen is snapped to whole pixels (half away from zero) before the glyph's bearings
    /// are applied; the returned pen x is not snapped.
    pub fn next_quad(&self, ch: char, pen_x: f32, pen_y: f32) -> AtlasResult<(GlyphQuad, f32)> {
        let glyph = self.glyph(ch)?;

        let x = pen_x.round();
        let y = pen_y.round();

        let quad = GlyphQuad {
            screen: ScreenRect {
                min: [x + glyph.offset[0], y + glyph.offset[1]],
                max: [x + glyph.offset2[0], y + glyph.offset2[1]],
            },
            uv: glyph.atlas_rect.to_uv(self.width(), self.height()),
        };

        Ok((quad, pen_x + glyph.advance))
    }

    /// Walk `text` from `origin` (pen on the baseline), one quad per character.
    ///
    /// Fails on the first character outside the atlas range.
    pub fn layout_line(&self, text: &str, origin: [f32; 2]) -> AtlasResult<LineQuads> {
        let mut pen_x = origin[0];
        let mut quads = Vec::with_capacity(text.len());

        for ch in text.chars() {
            let (quad, next) = self.next_quad(ch, pen_x, origin[1])?;
            quads.push(quad);
            pen_x = next;
        }

        Ok(LineQuads { quads, pen_x })
    }

    /// Total advance of `text`.
    pub fn measure_line(&self, text: &str) -> AtlasResult<f32> {
        text.chars()
            .map(|ch| self.glyph(ch).map(|g| g.advance))
            .sum()
    }
}

/// Free-function form of [`Atlas::next_quad`].
pub fn query_quad(
    atlas: &Atlas,
    ch: char,
    pen_x: f32,
    pen_y: f32,
) -> AtlasResult<(GlyphQuad, f32)> {
    atlas.next_quad(ch, pen_x, pen_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_atlas, AtlasConfig, AtlasError, GlyphRange};
    use glyph_raster::DebugFont;

    fn debug_atlas() -> Atlas {
        let cfg = AtlasConfig::new(GlyphRange::ASCII, 12.0)
            .with_oversample(1, 1)
            .with_size(256, 256);
        build_atlas(&mut DebugFont::new(), cfg).unwrap()
    }

    #[test]
    fn test_uv_matches_atlas_rect() {
        let atlas = debug_atlas();
        for (ch, metrics) in atlas.glyphs() {
            let (quad, _) = atlas.next_quad(ch, 10.0, 20.0).unwrap();
            let r = metrics.atlas_rect;
            assert_eq!(quad.uv.min, [r.x0 as f32 / 256.0, r.y0 as f32 / 256.0]);
            assert_eq!(quad.uv.max, [r.x1 as f32 / 256.0, r.y1 as f32 / 256.0]);
            for v in quad.uv.min.iter().chain(&quad.uv.max) {
                assert!((0.0..=1.0).contains(v));
            }
        }
    }

    #[test]
    fn test_pen_is_rounded_before_bearings() {
        let atlas = debug_atlas();
        let glyph = *atlas.glyph('H').unwrap();

        let (quad, next) = atlas.next_quad('H', 10.5, 19.4).unwrap();
        assert_eq!(quad.screen.min, [11.0 + glyph.offset[0], 19.0 + glyph.offset[1]]);
        assert_eq!(quad.screen.max, [11.0 + glyph.offset2[0], 19.0 + glyph.offset2[1]]);
        assert_eq!(next, 10.5 + glyph.advance);

        // Half away from zero on the negative side too.
        let (quad, _) = atlas.next_quad('H', -2.5, 0.0).unwrap();
        assert_eq!(quad.screen.min[0], -3.0 + glyph.offset[0]);
    }

    #[test]
    fn test_out_of_range_is_an_error() {
        let atlas = debug_atlas();
        assert!(matches!(
            atlas.next_quad('~', 0.0, 0.0),
            Err(AtlasError::GlyphOutOfRange { ch: '~', .. })
        ));
        assert!(query_quad(&atlas, 'ß', 0.0, 0.0).is_err());
        assert!(atlas.layout_line("ok\u{7F}", [0.0, 0.0]).is_err());
    }

    #[test]
    fn test_pen_advances_monotonically() {
        let atlas = debug_atlas();
        let line = atlas.layout_line("Hello, World!", [4.0, 30.0]).unwrap();
        assert_eq!(line.quads.len(), 13);

        let mut pen_x = 4.0;
        for ch in "Hello, World!".chars() {
            let (_, next) = atlas.next_quad(ch, pen_x, 30.0).unwrap();
            assert!(next >= pen_x);
            pen_x = next;
        }
        assert_eq!(line.pen_x, pen_x);
        assert_eq!(atlas.measure_line("Hello, World!").unwrap(), pen_x - 4.0);
    }

    #[test]
    fn test_space_quad_is_empty() {
        let atlas = debug_atlas();
        let (quad, next) = atlas.next_quad(' ', 0.0, 0.0).unwrap();
        assert!(quad.is_empty());
        assert_eq!(next, 8.0);
    }

    #[test]
    fn test_vertices_cover_quad_corners() {
        let quad = GlyphQuad {
            screen: ScreenRect {
                min: [1.0, 2.0],
                max: [3.0, 4.0],
            },
            uv: UvRect::new([0.0, 0.5], [0.25, 1.0]),
        };
        let verts = quad.vertices();
        assert_eq!(verts[0], [3.0, 4.0, 0.25, 1.0]);
        assert_eq!(verts[4], [1.0, 2.0, 0.0, 0.5]);
        assert_eq!(bytemuck::bytes_of(&quad).len(), 8 * 4);
    }
}
