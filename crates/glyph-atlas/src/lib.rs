//! # glyph-atlas
//!
//! Fixed-size, single-channel glyph atlases.
//!
//! Renderers are expected to:
//! 1. Build an [`Atlas`] once per font/size with [`AtlasBuilder`] (or [`build_atlas`]),
//!    feeding it any [`glyph_raster::OutlineRasterizer`].
//! 2. Upload [`Atlas::pixels`] into an `R8` texture.
//! 3. Walk text with [`Atlas::next_quad`] (or [`Atlas::layout_line`]) and draw the
//!    returned quads.
//!
//! Packing is done by [`RectPacker`], a skyline packer that is usable on its own.
//! [`hash_bytes`] and [`AtlasKey`] give callers a cache key for built atlases.

mod atlas;
mod builder;
#[cfg(feature = "image")]
mod codec;
mod config;
mod error;
mod hash;
mod pack;
mod query;

pub use atlas::*;
pub use builder::*;
#[cfg(feature = "image")]
pub use codec::*;
pub use config::*;
pub use error::*;
pub use hash::*;
pub use pack::*;
pub use query::*;

pub use glyph_raster;
