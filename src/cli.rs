//! Command-line arguments and the optional TOML settings file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use glyph_atlas::AtlasConfig;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "atlas-bake", version, about = "Bake a font into a glyph atlas PNG")]
pub struct Args {
    /// TrueType/OpenType font file. The built-in debug font is used when omitted.
    pub font: Option<PathBuf>,

    /// Face index inside a font collection.
    #[arg(long, default_value_t = 0)]
    pub face: usize,

    /// TOML settings file. Flags given on the command line take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long)]
    pub size: Option<f32>,

    /// Oversampling factors, `N` or `XxY`.
    #[arg(long, value_parser = parse_pair)]
    pub oversample: Option<[u32; 2]>,

    /// Atlas canvas size, `N` or `WxH`.
    #[arg(long, value_parser = parse_pair)]
    pub atlas_size: Option<[u32; 2]>,

    /// Padding in pixels after each glyph.
    #[arg(long)]
    pub padding: Option<u32>,

    /// Output PNG path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Lay out this text against the baked atlas and print its quads.
    #[arg(long)]
    pub sample: Option<String>,
}

/// Contents of a `--config` file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeFile {
    pub output: Option<PathBuf>,
    pub atlas: AtlasConfig,
}

impl BakeFile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        let file = toml::from_str(&text)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(file)
    }
}

impl Args {
    /// Settings file (if any) with command-line overrides applied.
    pub fn resolve(&self) -> Result<BakeFile, Box<dyn std::error::Error>> {
        let mut file = match &self.config {
            Some(path) => BakeFile::load(path)?,
            None => BakeFile::default(),
        };
        self.apply(&mut file);
        Ok(file)
    }

    fn apply(&self, file: &mut BakeFile) {
        let atlas = &mut file.atlas;
        if let Some(size) = self.size {
            atlas.font_px = size;
        }
        if let Some(oversample) = self.oversample {
            atlas.oversample = oversample;
        }
        if let Some(atlas_size) = self.atlas_size {
            atlas.size_px = atlas_size;
        }
        if let Some(padding) = self.padding {
            atlas.padding_px = padding;
        }
        if let Some(output) = &self.output {
            file.output = Some(output.clone());
        }
    }

    pub fn output_path(file: &BakeFile) -> PathBuf {
        file.output
            .clone()
            .unwrap_or_else(|| PathBuf::from("atlas.png"))
    }
}

/// Parses `"8"` as `[8, 8]` and `"4x2"` as `[4, 2]`.
fn parse_pair(s: &str) -> Result<[u32; 2], String> {
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid number {v:?}: {e}"))
    };

    match s.split_once(|c: char| c == 'x' || c == 'X') {
        Some((a, b)) => Ok([parse(a)?, parse(b)?]),
        None => {
            let v = parse(s)?;
            Ok([v, v])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_atlas::GlyphRange;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("8"), Ok([8, 8]));
        assert_eq!(parse_pair("4x2"), Ok([4, 2]));
        assert_eq!(parse_pair("512X256"), Ok([512, 256]));
        assert!(parse_pair("4x").is_err());
        assert!(parse_pair("-1").is_err());
    }

    #[test]
    fn test_settings_round_trip() {
        let file = BakeFile {
            atlas: AtlasConfig::new(GlyphRange::new('0', ':'), 18.0)
                .with_oversample(2, 1)
                .with_size(128, 64),
            output: Some(PathBuf::from("digits.png")),
        };

        let text = toml::to_string(&file).unwrap();
        let back: BakeFile = toml::from_str(&text).unwrap();
        assert_eq!(back, file);
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let file: BakeFile = toml::from_str(
            r#"
            [atlas]
            font_px = 24.0
            oversample = [2, 2]
            "#,
        )
        .unwrap();

        assert_eq!(file.atlas.font_px, 24.0);
        assert_eq!(file.atlas.oversample, [2, 2]);
        assert_eq!(file.atlas.range, GlyphRange::ASCII);
        assert_eq!(file.atlas.size_px, [1024, 1024]);
        assert_eq!(file.output, None);
    }

    #[test]
    fn test_flags_override_file() {
        let args = Args::parse_from([
            "atlas-bake",
            "--size",
            "16",
            "--atlas-size",
            "256x128",
            "-o",
            "out.png",
        ]);
        let mut file = BakeFile {
            atlas: AtlasConfig::default().with_padding(3),
            output: Some(PathBuf::from("from-file.png")),
        };
        args.apply(&mut file);

        assert_eq!(file.atlas.font_px, 16.0);
        assert_eq!(file.atlas.size_px, [256, 128]);
        assert_eq!(file.atlas.padding_px, 3);
        assert_eq!(file.atlas.oversample, [8, 8]);
        assert_eq!(Args::output_path(&file), PathBuf::from("out.png"));
        assert!(args.font.is_none());
    }
}
