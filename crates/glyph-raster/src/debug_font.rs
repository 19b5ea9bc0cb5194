//! Tiny built-in stroke font that needs no font file.
//!
//! Glyphs are drawn from a handful of segments (seven-segment style bars plus dots and
//! diagonals) into a monospaced cell. Output is an `R8` coverage mask like any other
//! rasterizer, so atlases built from it exercise the full packing/blit path.
//!
//! Oversampling stretches the cell per axis; the advance stays in un-oversampled pixels.

use crate::{check_request, GlyphBitmap, OutlineRasterizer, RasterError, RasterRequest, RasterResult};

/// Monospace font metrics in pixels (at the font's *base* pixel size).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugFontMetrics {
    /// Base glyph advance (monospace cell width) in pixels.
    pub advance_px: u32,
    /// Base glyph cell height in pixels.
    pub height_px: u32,
    /// Baseline offset from the top of the cell in pixels.
    pub baseline_from_top_px: u32,
}

mod seg {
    pub const TOP: u32 = 1 << 0;
    pub const MID: u32 = 1 << 1;
    pub const BOT: u32 = 1 << 2;
    pub const UL: u32 = 1 << 3;
    pub const LL: u32 = 1 << 4;
    pub const UR: u32 = 1 << 5;
    pub const LR: u32 = 1 << 6;
    pub const CV_UP: u32 = 1 << 7;
    pub const CV_LO: u32 = 1 << 8;
    pub const MID_R: u32 = 1 << 9;
    pub const DOT_T: u32 = 1 << 10;
    pub const DOT_B: u32 = 1 << 11;
    pub const DOT_C: u32 = 1 << 12;
    pub const DOT_UL: u32 = 1 << 13;
    pub const DOT_UR: u32 = 1 << 14;
    pub const DOT_LL: u32 = 1 << 15;
    pub const DOT_LR: u32 = 1 << 16;
    pub const DIAG_F: u32 = 1 << 17;
    pub const DIAG_B: u32 = 1 << 18;

    pub const LEFT: u32 = UL | LL;
    pub const RIGHT: u32 = UR | LR;
    pub const CV: u32 = CV_UP | CV_LO;
    pub const BOX: u32 = TOP | BOT | LEFT | RIGHT;
}

/// Segment set for a character. Unknown printable characters get a placeholder box.
fn segments(ch: char) -> u32 {
    use seg::*;

    match ch.to_ascii_uppercase() {
        ' ' => 0,
        '0' | 'O' | 'D' => BOX,
        '1' => RIGHT,
        '2' => TOP | MID | BOT | UR | LL,
        '3' => TOP | MID | BOT | RIGHT,
        '4' => MID | LEFT | RIGHT,
        '5' | 'S' => TOP | MID | BOT | UL | LR,
        '6' => TOP | MID | BOT | LEFT | LR,
        '7' => TOP | RIGHT,
        '8' | 'B' => TOP | MID | BOT | LEFT | RIGHT,
        '9' => TOP | MID | BOT | RIGHT | UL,
        'A' => TOP | MID | LEFT | RIGHT,
        'C' => TOP | BOT | LEFT,
        'E' => TOP | MID | BOT | LEFT,
        'F' => TOP | MID | LEFT,
        'G' => TOP | BOT | LEFT | LR | MID_R,
        'H' => MID | LEFT | RIGHT,
        'I' => TOP | BOT | CV,
        'J' => BOT | RIGHT | LL,
        'K' => LEFT | MID_R | DOT_UR | LR,
        'L' => LEFT | BOT,
        'M' => LEFT | RIGHT | DOT_UL | DOT_UR,
        'N' => LEFT | RIGHT | DOT_T | DOT_C,
        'P' => TOP | MID | LEFT | UR,
        'Q' => BOX | DOT_LR,
        'R' => TOP | MID | LEFT | UR | DOT_LR,
        'T' => TOP | CV,
        'U' => LEFT | RIGHT | BOT,
        'V' => LEFT | RIGHT | DOT_B,
        'W' => LEFT | RIGHT | BOT | CV_LO,
        'X' => DOT_UL | DOT_UR | DOT_LL | DOT_LR | DOT_C,
        'Y' => DOT_UL | DOT_UR | MID | CV_LO,
        'Z' => TOP | BOT | DOT_UR | DOT_C | DOT_LL,
        '-' | '~' => MID,
        '_' => BOT,
        '.' => DOT_B,
        ',' => DOT_B | DOT_LL,
        ':' => DOT_T | DOT_B,
        ';' => DOT_T | DOT_B | DOT_LL,
        '!' => CV_UP | DOT_B,
        '?' => TOP | UR | MID_R | DOT_B,
        '\'' | '"' | '`' => DOT_T,
        '/' => DIAG_F,
        '\\' => DIAG_B,
        '|' => CV,
        '+' => MID | CV,
        '=' => MID | BOT,
        '(' | '[' | '{' | '<' => TOP | BOT | LEFT,
        ')' | ']' | '}' | '>' => TOP | BOT | RIGHT,
        _ => BOX,
    }
}

/// Tiny builtin "font".
///
/// This produces a crude but readable bitmap for ASCII. For unknown printable
/// glyphs it renders a placeholder box; control characters are reported missing.
#[derive(Clone, Debug)]
pub struct DebugFont {
    metrics: DebugFontMetrics,
}

impl Default for DebugFont {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugFont {
    /// Base cell is 8x12; baseline is at 9px from the top.
    pub fn new() -> Self {
        Self::with_metrics(DebugFontMetrics {
            advance_px: 8,
            height_px: 12,
            baseline_from_top_px: 9,
        })
    }

    pub fn with_metrics(metrics: DebugFontMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> DebugFontMetrics {
        self.metrics
    }

    /// Integer cell scale for a requested pixel size (never below 1).
    pub fn scale_for(&self, font_px: f32) -> u32 {
        let base = self.metrics.height_px.max(1) as f32;
        (font_px / base).round().max(1.0) as u32
    }

    /// Scaled cell geometry, or `Malformed` if any dimension overflows.
    fn cell(&self, scale: u32, oversample: [u32; 2]) -> RasterResult<Cell> {
        let too_large = || {
            RasterError::Malformed(format!(
                "debug font cell at scale {} with {}x{} oversampling is too large",
                scale, oversample[0], oversample[1]
            ))
        };

        let m = self.metrics;
        let sx = scale.checked_mul(oversample[0]).ok_or_else(too_large)?;
        let sy = scale.checked_mul(oversample[1]).ok_or_else(too_large)?;
        let advance = m.advance_px.checked_mul(scale).ok_or_else(too_large)?;
        let w = m.advance_px.checked_mul(sx).ok_or_else(too_large)?;
        let h = m.height_px.checked_mul(sy).ok_or_else(too_large)?;
        // Canvas rows are indexed in u32.
        w.checked_mul(h).ok_or_else(too_large)?;
        let baseline = m
            .baseline_from_top_px
            .checked_mul(sy)
            .and_then(|b| i32::try_from(b).ok())
            .ok_or_else(too_large)?;

        Ok(Cell {
            sx,
            sy,
            w,
            h,
            baseline,
            advance_px: advance as f32,
        })
    }

    /// Rasterize a glyph into a scaled cell.
    fn draw(&self, ch: char, cell: Cell) -> GlyphBitmap {
        let mask = segments(ch);
        if mask == 0 {
            return GlyphBitmap::empty(ch, cell.advance_px);
        }

        let mut canvas = Canvas::new(cell.w, cell.h, cell.sx, cell.sy);
        canvas.stroke(mask);

        GlyphBitmap {
            ch,
            size_px: [canvas.w, canvas.h],
            bearing_px: [0, -cell.baseline],
            advance_px: cell.advance_px,
            pixels: canvas.pixels,
        }
    }
}

/// One glyph cell after scaling and oversampling.
#[derive(Clone, Copy, Debug)]
struct Cell {
    /// Per-axis pixel scale, oversampling included.
    sx: u32,
    sy: u32,
    w: u32,
    h: u32,
    baseline: i32,
    advance_px: f32,
}

impl OutlineRasterizer for DebugFont {
    fn rasterize(&mut self, req: RasterRequest) -> RasterResult<GlyphBitmap> {
        check_request(&req)?;
        if req.ch.is_control() {
            return Err(RasterError::MissingGlyph(req.ch));
        }

        let cell = self.cell(self.scale_for(req.font_px), req.oversample)?;
        Ok(self.draw(req.ch, cell))
    }
}

/// Cell-sized coverage buffer with the stroke box laid out inside it.
struct Canvas {
    w: u32,
    h: u32,
    /// Stroke thickness per axis.
    tx: u32,
    ty: u32,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    fn new(w: u32, h: u32, sx: u32, sy: u32) -> Self {
        let pad_x = sx;
        let pad_y = 2 * sy;
        let box_w = w.saturating_sub(2 * pad_x).max(1);
        let box_h = h.saturating_sub(2 * pad_y).max(1);

        Self {
            w,
            h,
            tx: sx,
            ty: sy,
            x0: pad_x,
            y0: pad_y,
            x1: pad_x + box_w,
            y1: pad_y + box_h,
            pixels: vec![0u8; (w * h) as usize],
        }
    }

    fn fill(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        let x1 = x1.min(self.w);
        let y1 = y1.min(self.h);
        for y in y0..y1 {
            let row = (y * self.w) as usize;
            for x in x0..x1 {
                self.pixels[row + x as usize] = 255;
            }
        }
    }

    fn dot(&mut self, x: u32, y: u32) {
        self.fill(x, y, x + self.tx, y + self.ty);
    }

    fn stroke(&mut self, mask: u32) {
        let (x0, y0, x1, y1, tx, ty) = (self.x0, self.y0, self.x1, self.y1, self.tx, self.ty);
        let box_w = x1 - x0;
        let box_h = y1 - y0;
        let mid_x = x0 + box_w / 2;
        let mid_y = y0 + box_h / 2;
        let qx = box_w / 4;
        let qy = box_h / 4;

        let has = |bit: u32| mask & bit != 0;

        if has(seg::TOP) {
            self.fill(x0, y0, x1, y0 + ty);
        }
        if has(seg::MID) {
            self.fill(x0, mid_y, x1, mid_y + ty);
        }
        if has(seg::BOT) {
            self.fill(x0, y1.saturating_sub(ty), x1, y1);
        }
        if has(seg::UL) {
            self.fill(x0, y0, x0 + tx, mid_y + ty);
        }
        if has(seg::LL) {
            self.fill(x0, mid_y, x0 + tx, y1);
        }
        if has(seg::UR) {
            self.fill(x1.saturating_sub(tx), y0, x1, mid_y + ty);
        }
        if has(seg::LR) {
            self.fill(x1.saturating_sub(tx), mid_y, x1, y1);
        }
        if has(seg::CV_UP) {
            self.fill(mid_x, y0, mid_x + tx, mid_y);
        }
        if has(seg::CV_LO) {
            self.fill(mid_x, mid_y, mid_x + tx, y1);
        }
        if has(seg::MID_R) {
            self.fill(mid_x, mid_y, x1, mid_y + ty);
        }

        if has(seg::DOT_T) {
            self.dot(mid_x, y0 + qy);
        }
        if has(seg::DOT_B) {
            self.dot(mid_x, y1.saturating_sub(ty));
        }
        if has(seg::DOT_C) {
            self.dot(mid_x, mid_y);
        }
        if has(seg::DOT_UL) {
            self.dot(x0 + qx, y0 + qy);
        }
        if has(seg::DOT_UR) {
            self.dot(x1.saturating_sub(qx + tx), y0 + qy);
        }
        if has(seg::DOT_LL) {
            self.dot(x0 + qx, y1.saturating_sub(qy + ty));
        }
        if has(seg::DOT_LR) {
            self.dot(x1.saturating_sub(qx + tx), y1.saturating_sub(qy + ty));
        }

        if has(seg::DIAG_F) || has(seg::DIAG_B) {
            // One step per pixel row; the x walk is proportional to the row.
            for i in 0..box_h {
                let dx = i * box_w / box_h;
                let x = if has(seg::DIAG_F) {
                    x1.saturating_sub(tx + dx)
                } else {
                    x0 + dx
                };
                self.fill(x, y0 + i, x + tx, y0 + i + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(bitmap: &GlyphBitmap) -> usize {
        bitmap.pixels.iter().filter(|&&p| p > 0).count()
    }

    #[test]
    fn test_space_is_empty_but_advances() {
        let mut font = DebugFont::new();
        let glyph = font
            .rasterize(RasterRequest::new(' ', 12.0, [1, 1]))
            .unwrap();
        assert!(glyph.is_empty());
        assert_eq!(glyph.advance_px, 8.0);
    }

    #[test]
    fn test_cell_size_and_buffer_length() {
        let mut font = DebugFont::new();
        let glyph = font
            .rasterize(RasterRequest::new('A', 24.0, [1, 1]))
            .unwrap();
        assert_eq!(glyph.size_px, [16, 24]);
        assert_eq!(glyph.pixels.len(), 16 * 24);
        assert!(coverage(&glyph) > 0);
        assert_eq!(glyph.bearing_px, [0, -18]);
    }

    #[test]
    fn test_oversampling_stretches_bitmap_not_advance() {
        let mut font = DebugFont::new();
        let plain = font
            .rasterize(RasterRequest::new('H', 12.0, [1, 1]))
            .unwrap();
        let over = font
            .rasterize(RasterRequest::new('H', 12.0, [3, 2]))
            .unwrap();

        assert_eq!(over.size_px, [plain.width() * 3, plain.height() * 2]);
        assert_eq!(over.advance_px, plain.advance_px);
        assert_eq!(over.bearing_px[1], plain.bearing_px[1] * 2);
    }

    #[test]
    fn test_unknown_printable_gets_box() {
        let mut font = DebugFont::new();
        let glyph = font
            .rasterize(RasterRequest::new('@', 12.0, [1, 1]))
            .unwrap();
        let boxed = font
            .rasterize(RasterRequest::new('0', 12.0, [1, 1]))
            .unwrap();
        assert_eq!(glyph.pixels, boxed.pixels);
    }

    #[test]
    fn test_control_char_is_missing() {
        let mut font = DebugFont::new();
        let err = font
            .rasterize(RasterRequest::new('\n', 12.0, [1, 1]))
            .unwrap_err();
        assert_eq!(err, RasterError::MissingGlyph('\n'));
    }

    #[test]
    fn test_diagonals_stay_in_bounds() {
        let mut font = DebugFont::new();
        for ch in ['/', '\\'] {
            let glyph = font
                .rasterize(RasterRequest::new(ch, 36.0, [2, 2]))
                .unwrap();
            assert_eq!(glyph.pixels.len(), (glyph.width() * glyph.height()) as usize);
            assert!(coverage(&glyph) > 0);
        }
    }

    #[test]
    fn test_huge_size_is_rejected_not_overflowed() {
        let mut font = DebugFont::new();
        for ch in ['A', ' '] {
            let err = font
                .rasterize(RasterRequest::new(ch, 200_000.0, [8, 8]))
                .unwrap_err();
            assert!(matches!(err, RasterError::Malformed(_)));
        }
        assert!(font
            .rasterize(RasterRequest::new('A', f32::MAX, [1, 1]))
            .is_err());
    }

    #[test]
    fn test_scale_for_rounds_to_cells() {
        let font = DebugFont::new();
        assert_eq!(font.scale_for(1.0), 1);
        assert_eq!(font.scale_for(12.0), 1);
        assert_eq!(font.scale_for(32.0), 3);
    }
}
