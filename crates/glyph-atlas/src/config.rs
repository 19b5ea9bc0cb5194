//! Atlas build parameters.
//!
//! Defaults reproduce the classic ASCII atlas: printable characters from space up to
//! (but not including) `'~'`, 32px, 8x8 oversampling on a 1024x1024 canvas with one
//! pixel of padding between glyphs.

use crate::{AtlasError, AtlasResult};

/// A contiguous, half-open block of characters `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlyphRange {
    pub start: char,
    pub end: char,
}

impl GlyphRange {
    /// Printable ASCII starting at space, `'~'` excluded (94 characters).
    pub const ASCII: GlyphRange = GlyphRange::new(' ', '~');

    pub const fn new(start: char, end: char) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.start <= ch && ch < self.end
    }

    /// Number of characters in the range.
    pub fn len(&self) -> usize {
        self.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Iterate the range in ascending order (surrogate code points are skipped).
    pub fn chars(&self) -> std::ops::Range<char> {
        self.start..self.end
    }
}

impl Default for GlyphRange {
    fn default() -> Self {
        Self::ASCII
    }
}

/// Everything that determines the contents of an atlas, apart from the font itself.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AtlasConfig {
    /// Font size in pixels per em.
    pub font_px: f32,
    /// Horizontal and vertical oversampling factors.
    pub oversample: [u32; 2],
    /// Atlas canvas size in pixels (width, height). Never resized after build.
    pub size_px: [u32; 2],
    /// Empty pixels reserved to the right of and below every non-empty glyph.
    pub padding_px: u32,
    pub range: GlyphRange,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            font_px: 32.0,
            oversample: [8, 8],
            size_px: [1024, 1024],
            padding_px: 1,
            range: GlyphRange::ASCII,
        }
    }
}

impl AtlasConfig {
    pub fn new(range: GlyphRange, font_px: f32) -> Self {
        Self {
            range,
            font_px,
            ..Default::default()
        }
    }

    pub fn with_oversample(mut self, x: u32, y: u32) -> Self {
        self.oversample = [x, y];
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size_px = [width, height];
        self
    }

    pub fn with_padding(mut self, padding_px: u32) -> Self {
        self.padding_px = padding_px;
        self
    }

    /// Reject parameters that can never produce an atlas.
    pub fn validate(&self) -> AtlasResult<()> {
        if self.range.is_empty() {
            return Err(AtlasError::InvalidConfig(format!(
                "empty character range {:?}..{:?}",
                self.range.start, self.range.end
            )));
        }
        if !self.font_px.is_finite() || self.font_px <= 0.0 {
            return Err(AtlasError::InvalidConfig(format!(
                "font size must be positive, got {}",
                self.font_px
            )));
        }
        if self.oversample[0] == 0 || self.oversample[1] == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "oversampling must be at least 1x1, got {}x{}",
                self.oversample[0], self.oversample[1]
            )));
        }
        if self.size_px[0] == 0 || self.size_px[1] == 0 {
            return Err(AtlasError::InvalidConfig(format!(
                "atlas size must be non-zero, got {}x{}",
                self.size_px[0], self.size_px[1]
            )));
        }
        Ok(())
    }
}
