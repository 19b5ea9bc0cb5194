//! Glyph atlas baker
//!
//! Rasterizes a character range from a font, packs it into a single-channel atlas and
//! writes the atlas as a PNG.

mod cli;

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use cli::Args;
use glyph_atlas::{AtlasBuilder, AtlasKey};
use glyph_raster::swash_raster::SwashRasterizer;
use glyph_raster::{DebugFont, OutlineRasterizer};

type BakeResult<T> = Result<T, Box<dyn std::error::Error>>;

fn load_rasterizer(args: &Args) -> BakeResult<(Box<dyn OutlineRasterizer>, Vec<u8>)> {
    match &args.font {
        Some(path) => {
            let bytes = fs::read(path)?;
            let font = SwashRasterizer::from_index(bytes.clone(), args.face)?;
            log::info!("Loaded font {} ({} bytes)", path.display(), bytes.len());
            Ok((Box::new(font), bytes))
        }
        None => {
            log::warn!("No font given, using the built-in debug font");
            Ok((Box::new(DebugFont::new()), Vec::new()))
        }
    }
}

fn run(args: Args) -> BakeResult<()> {
    let settings = args.resolve()?;
    let output = Args::output_path(&settings);
    let config = settings.atlas;

    let (mut rasterizer, font_bytes) = load_rasterizer(&args)?;

    let key = AtlasKey::new(&font_bytes, &config);
    log::info!(
        "Baking {:?}..{:?} at {}px, {}x{} oversampling, {}x{} canvas (key {:08x})",
        config.range.start,
        config.range.end,
        config.font_px,
        config.oversample[0],
        config.oversample[1],
        config.size_px[0],
        config.size_px[1],
        key.digest()
    );

    let atlas = AtlasBuilder::new(config).build(rasterizer.as_mut())?;
    atlas.save_png(&output)?;
    log::info!(
        "Wrote {} ({:.1}% occupied)",
        output.display(),
        atlas.occupancy() * 100.0
    );

    if let Some(sample) = &args.sample {
        let line = atlas.layout_line(sample, [0.0, atlas.font_px()])?;
        for (ch, quad) in sample.chars().zip(&line.quads) {
            println!(
                "{ch:?}: screen {:?}..{:?} uv {:?}..{:?}",
                quad.screen.min, quad.screen.max, quad.uv.min, quad.uv.max
            );
        }
        println!("advance {}", line.pen_x);
    }

    Ok(())
}

fn main() -> ExitCode {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
