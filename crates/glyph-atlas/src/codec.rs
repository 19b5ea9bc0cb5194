//! Atlas image persistence (feature `image`).
//!
//! Thin wrappers over the `image` crate. Nothing here is needed to build or query an
//! atlas; it exists to save atlases for inspection and to load raw pixel data back.

use std::path::Path;

use image::{ColorType, GrayImage, ImageFormat};

use crate::{Atlas, AtlasError, AtlasResult};

/// Raw 8-bit pixels decoded from an encoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedImage {
    /// Row-major, `width * height * channels` bytes.
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

fn color_type(channels: u8) -> AtlasResult<ColorType> {
    match channels {
        1 => Ok(ColorType::L8),
        2 => Ok(ColorType::La8),
        3 => Ok(ColorType::Rgb8),
        4 => Ok(ColorType::Rgba8),
        n => Err(AtlasError::Image(format!("unsupported channel count {}", n))),
    }
}

/// Decode an encoded image (PNG) into 8-bit pixels, keeping its channel count.
pub fn decode_image(bytes: &[u8]) -> AtlasResult<DecodedImage> {
    let image = image::load_from_memory(bytes).map_err(|e| AtlasError::Image(e.to_string()))?;
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(AtlasError::Image("decoded image is empty".to_string()));
    }

    let channels = image.color().channel_count();
    // Normalize to 8 bits per channel.
    let pixels = match channels {
        1 => image.into_luma8().into_raw(),
        2 => image.into_luma_alpha8().into_raw(),
        3 => image.into_rgb8().into_raw(),
        _ => image.into_rgba8().into_raw(),
    };

    Ok(DecodedImage {
        pixels,
        width,
        height,
        channels: channels.min(4),
    })
}

/// Encode 8-bit pixels as a PNG file at `path`.
pub fn encode_image(
    path: impl AsRef<Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: u8,
) -> AtlasResult<()> {
    let expected = width as usize * height as usize * channels as usize;
    if pixels.len() != expected {
        return Err(AtlasError::Image(format!(
            "{}x{}x{} image needs {} bytes, got {}",
            width,
            height,
            channels,
            expected,
            pixels.len()
        )));
    }

    image::save_buffer_with_format(
        path.as_ref(),
        pixels,
        width,
        height,
        color_type(channels)?,
        ImageFormat::Png,
    )
    .map_err(|e| AtlasError::Image(e.to_string()))
}

impl Atlas {
    /// The atlas as a grayscale image (coverage as luminance).
    pub fn to_image(&self) -> AtlasResult<GrayImage> {
        GrayImage::from_raw(self.width(), self.height(), self.pixels().to_vec())
            .ok_or_else(|| AtlasError::Image("atlas buffer does not match its size".to_string()))
    }

    /// Save the atlas as a single-channel PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> AtlasResult<()> {
        let path = path.as_ref();
        encode_image(path, self.pixels(), self.width(), self.height(), 1)?;
        log::info!("Saved {}x{} atlas to {}", self.width(), self.height(), path.display());
        Ok(())
    }
}
