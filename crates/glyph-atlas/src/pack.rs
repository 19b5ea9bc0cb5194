//! Skyline rectangle packer.
//!
//! Packs axis-aligned rectangles into a fixed-size canvas. The packer knows nothing about
//! fonts: it answers where each `(width, height)` request goes, or that the canvas is full.
//!
//! Current approach: bottom-left skyline, the same rule as `stb_rect_pack`'s default
//! heuristic that the classic baked-ASCII atlas was built with.
//! - The skyline is a left-to-right list of segments, each recording the lowest free y
//!   for its x-span. It starts as one segment spanning the canvas at y = 0.
//! - A rectangle may start at any segment's x. It rests on the highest segment it spans.
//! - The candidate with the lowest resting y wins; ties go to the leftmost x.
//! - Batches are placed tallest first (then widest, then input order), which keeps the
//!   skyline flat and the result deterministic.

use std::cmp::Reverse;

use crate::{AtlasError, AtlasPx, AtlasResult};

/// One packing request and where it ended up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PackedRect {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl PackedRect {
    #[inline]
    pub const fn max_x(self) -> u32 {
        self.x + self.width
    }

    #[inline]
    pub const fn max_y(self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the two rectangles share any area. Empty rectangles never overlap.
    pub const fn overlaps(self, other: PackedRect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }
}

/// A span `[x, x + width)` of the skyline whose lowest free row is `y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Segment {
    x: u32,
    width: u32,
    y: u32,
}

impl Segment {
    #[inline]
    const fn end(self) -> u32 {
        self.x + self.width
    }
}

/// Skyline packer over a fixed-size canvas.
#[derive(Clone, Debug)]
pub struct RectPacker {
    width: u32,
    height: u32,
    skyline: Vec<Segment>,
}

impl RectPacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            skyline: vec![Segment {
                x: 0,
                width,
                y: 0,
            }],
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

    /// Forget every placement.
    pub fn clear(&mut self) {
        self.skyline.clear();
        self.skyline.push(Segment {
            x: 0,
            width: self.width,
            y: 0,
        });
    }

    /// Place a single rectangle, or return `None` if it does not fit anywhere.
    ///
    /// Zero-area rectangles always succeed at the origin without consuming space.
    pub fn insert(&mut self, size: [u32; 2]) -> Option<AtlasPx> {
        let [w, h] = size;
        if w == 0 || h == 0 {
            return Some(AtlasPx::new(0, 0));
        }
        if w > self.width || h > self.height {
            return None;
        }

        // (segment index, resting y)
        let mut best: Option<(usize, u32)> = None;
        for index in 0..self.skyline.len() {
            let Some(y) = self.fit(index, w, h) else {
                continue;
            };
            // Segments are scanned left to right, so a strict `<` keeps the leftmost tie.
            if best.map_or(true, |(_, best_y)| y < best_y) {
                best = Some((index, y));
            }
        }

        let (index, y) = best?;
        let x = self.skyline[index].x;
        self.place(index, x, y + h, w);
        Some(AtlasPx::new(x, y))
    }

    /// Pack a whole batch. Placements come back in input order.
    ///
    /// Fails with [`AtlasError::PackingExhausted`] on the first request that cannot be
    /// placed; the packer is left in an unspecified state in that case.
    pub fn pack(&mut self, sizes: &[[u32; 2]]) -> AtlasResult<Vec<PackedRect>> {
        let mut order: Vec<usize> = (0..sizes.len()).collect();
        // Stable sort: equal sizes keep input order.
        order.sort_by_key(|&i| (Reverse(sizes[i][1]), Reverse(sizes[i][0])));

        let mut placed = vec![None; sizes.len()];
        for index in order {
            let [width, height] = sizes[index];
            let pos = self
                .insert(sizes[index])
                .ok_or(AtlasError::PackingExhausted {
                    index,
                    ch: None,
                    requested_width: width,
                    requested_height: height,
                    canvas_width: self.width,
                    canvas_height: self.height,
                })?;
            placed[index] = Some(PackedRect {
                width,
                height,
                x: pos.x,
                y: pos.y,
            });
        }

        Ok(placed.into_iter().flatten().collect())
    }

    /// Resting y for a `w x h` rectangle whose left edge is at segment `index`.
    fn fit(&self, index: usize, w: u32, h: u32) -> Option<u32> {
        let x = self.skyline[index].x;
        if x + w > self.width {
            return None;
        }

        let mut y = 0;
        let mut remaining = w;
        for seg in &self.skyline[index..] {
            if remaining == 0 {
                break;
            }
            y = y.max(seg.y);
            if y + h > self.height {
                return None;
            }
            remaining = remaining.saturating_sub(seg.width);
        }
        Some(y)
    }

    /// Raise `[x, x + w)` to `top`, starting at segment `index`.
    fn place(&mut self, index: usize, x: u32, top: u32, w: u32) {
        let end = x + w;

        // Drop fully covered segments, trim the one partially covered on the right.
        while index < self.skyline.len() && self.skyline[index].x < end {
            let seg = self.skyline[index];
            if seg.end() <= end {
                self.skyline.remove(index);
            } else {
                self.skyline[index] = Segment {
                    x: end,
                    width: seg.end() - end,
                    y: seg.y,
                };
                break;
            }
        }

        self.skyline.insert(
            index,
            Segment {
                x,
                width: w,
                y: top,
            },
        );
        self.merge();
    }

    fn merge(&mut self) {
        let mut i = 0;
        while i + 1 < self.skyline.len() {
            if self.skyline[i].y == self.skyline[i + 1].y {
                self.skyline[i].width += self.skyline[i + 1].width;
                self.skyline.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }
}

/// Pack `sizes` into a fresh `canvas_width x canvas_height` canvas.
pub fn pack_rects(
    canvas_width: u32,
    canvas_height: u32,
    sizes: &[[u32; 2]],
) -> AtlasResult<Vec<PackedRect>> {
    RectPacker::new(canvas_width, canvas_height).pack(sizes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_valid(placed: &[PackedRect], w: u32, h: u32) {
        for (i, a) in placed.iter().enumerate() {
            assert!(a.max_x() <= w && a.max_y() <= h, "rect {} out of bounds: {:?}", i, a);
            for b in &placed[i + 1..] {
                assert!(!a.overlaps(*b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    fn random_sizes(seed: u64, count: usize, max: u32) -> Vec<[u32; 2]> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| [rng.random_range(1..=max), rng.random_range(1..=max)])
            .collect()
    }

    #[test]
    fn test_single_rect_at_origin() {
        let placed = pack_rects(64, 64, &[[10, 20]]).unwrap();
        assert_eq!(
            placed,
            vec![PackedRect {
                width: 10,
                height: 20,
                x: 0,
                y: 0
            }]
        );
    }

    #[test]
    fn test_output_follows_input_order() {
        let sizes = [[4, 4], [8, 16], [6, 2]];
        let placed = pack_rects(32, 32, &sizes).unwrap();
        for (rect, size) in placed.iter().zip(sizes) {
            assert_eq!([rect.width, rect.height], size);
        }
        // Tallest goes first, so it owns the origin.
        assert_eq!((placed[1].x, placed[1].y), (0, 0));
        assert_valid(&placed, 32, 32);
    }

    #[test]
    fn test_fills_row_before_stacking() {
        let placed = pack_rects(30, 30, &[[10, 10]; 4]).unwrap();
        let positions: Vec<_> = placed.iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(positions, vec![(0, 0), (10, 0), (20, 0), (0, 10)]);
    }

    #[test]
    fn test_exact_fit_grid() {
        let placed = pack_rects(40, 40, &[[10, 10]; 16]).unwrap();
        assert_valid(&placed, 40, 40);
        assert!(pack_rects(40, 40, &[[10, 10]; 17]).is_err());
    }

    #[test]
    fn test_full_canvas_requests_exhaust() {
        for n in 2..5 {
            let err = pack_rects(16, 8, &vec![[16, 8]; n]).unwrap_err();
            assert!(matches!(err, AtlasError::PackingExhausted { .. }));
        }
        assert!(pack_rects(16, 8, &[[16, 8]]).is_ok());
    }

    #[test]
    fn test_oversized_request_reports_index() {
        let err = pack_rects(32, 32, &[[4, 4], [33, 1]]).unwrap_err();
        assert_eq!(
            err,
            AtlasError::PackingExhausted {
                index: 1,
                ch: None,
                requested_width: 33,
                requested_height: 1,
                canvas_width: 32,
                canvas_height: 32,
            }
        );
    }

    #[test]
    fn test_zero_area_requests_take_no_space() {
        let placed = pack_rects(8, 8, &[[0, 0], [8, 8], [0, 5]]).unwrap();
        assert_eq!((placed[0].x, placed[0].y), (0, 0));
        assert_eq!((placed[1].x, placed[1].y), (0, 0));
        assert_valid(&placed, 8, 8);
    }

    #[test]
    fn test_fills_gap_under_skyline_step() {
        let mut packer = RectPacker::new(20, 20);
        assert_eq!(packer.insert([10, 15]), Some(AtlasPx::new(0, 0)));
        assert_eq!(packer.insert([10, 5]), Some(AtlasPx::new(10, 0)));
        // Lowest rest is on the right column at y = 5.
        assert_eq!(packer.insert([10, 5]), Some(AtlasPx::new(10, 5)));
        // Spanning both columns must rest on the taller one.
        assert_eq!(packer.insert([20, 5]), Some(AtlasPx::new(0, 15)));
        assert_eq!(packer.insert([1, 1]), None);
    }

    #[test]
    fn test_clear_resets_skyline() {
        let mut packer = RectPacker::new(10, 10);
        assert!(packer.insert([10, 10]).is_some());
        assert!(packer.insert([1, 1]).is_none());
        packer.clear();
        assert_eq!(packer.insert([10, 10]), Some(AtlasPx::new(0, 0)));
    }

    #[test]
    fn test_random_batches_never_overlap() {
        for seed in 0..20 {
            let sizes = random_sizes(seed, 60, 24);
            match pack_rects(256, 256, &sizes) {
                Ok(placed) => assert_valid(&placed, 256, 256),
                Err(err) => panic!("seed {} failed to pack: {}", seed, err),
            }
        }
    }

    #[test]
    fn test_packing_is_deterministic() {
        let sizes = random_sizes(7, 80, 30);
        let a = pack_rects(300, 300, &sizes).unwrap();
        let b = pack_rects(300, 300, &sizes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tight_canvas_fails_instead_of_truncating() {
        let sizes = random_sizes(3, 200, 32);
        let area: u32 = sizes.iter().map(|s| s[0] * s[1]).sum();
        let side = ((area as f32).sqrt() as u32) / 2;
        assert!(pack_rects(side, side, &sizes).is_err());
    }
}
