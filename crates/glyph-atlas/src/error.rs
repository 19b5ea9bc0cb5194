use glyph_raster::RasterError;

use crate::GlyphRange;

/// Errors that can occur while building or querying a glyph atlas.
#[derive(Debug, Clone, PartialEq)]
pub enum AtlasError {
    /// The rasterizer could not produce a bitmap for a character.
    RasterizationFailed {
        ch: char,
        font_px: f32,
        source: RasterError,
    },

    /// The canvas has no room left for a rectangle.
    PackingExhausted {
        /// Index of the request in the caller's batch.
        index: usize,
        /// Glyph behind the request, when the batch came from an atlas build.
        ch: Option<char>,
        requested_width: u32,
        requested_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    },

    /// A character outside the atlas's built range was queried.
    GlyphOutOfRange { ch: char, range: GlyphRange },

    /// Build parameters that can never produce an atlas.
    InvalidConfig(String),

    /// Encoding or decoding an atlas image failed.
    Image(String),
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::RasterizationFailed {
                ch,
                font_px,
                source,
            } => write!(
                f,
                "Failed to rasterize {:?} at {}px: {}",
                ch, font_px, source
            ),
            AtlasError::PackingExhausted {
                index,
                ch,
                requested_width,
                requested_height,
                canvas_width,
                canvas_height,
            } => {
                write!(f, "Atlas is full: ")?;
                if let Some(ch) = ch {
                    write!(f, "glyph {:?} ", ch)?;
                }
                write!(
                    f,
                    "(request #{}, {}x{}) does not fit in {}x{}",
                    index, requested_width, requested_height, canvas_width, canvas_height
                )
            }
            AtlasError::GlyphOutOfRange { ch, range } => write!(
                f,
                "Character {:?} (U+{:04X}) is outside the atlas range {:?}..{:?}",
                ch, *ch as u32, range.start, range.end
            ),
            AtlasError::InvalidConfig(msg) => write!(f, "Invalid atlas configuration: {}", msg),
            AtlasError::Image(msg) => write!(f, "Image error: {}", msg),
        }
    }
}

impl std::error::Error for AtlasError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AtlasError::RasterizationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AtlasError {
    fn from(err: std::io::Error) -> Self {
        AtlasError::Image(err.to_string())
    }
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;
