//! Byte hashing for cache keys.
//!
//! [`hash_bytes`] is Bob Jenkins' One-at-a-Time hash: cheap, non-cryptographic and
//! stable across platforms, which is all an asset cache key needs.

use crate::AtlasConfig;

/// One-at-a-Time hash of `bytes`. Every byte counts, zeros included.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0;
    for &b in bytes {
        hash = hash.wrapping_add(b as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }

    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);
    hash
}

/// [`hash_bytes`] over a string's UTF-8 bytes.
#[inline]
pub fn hash_str(s: &str) -> u32 {
    hash_bytes(s.as_bytes())
}

/// Identity of an atlas build: which font, which parameters.
///
/// Two builds with equal keys produce identical atlases, so the key can index a cache of
/// built atlases or baked atlas files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AtlasKey {
    pub font_hash: u32,
    pub range_start: char,
    pub range_end: char,
    /// `f32::to_bits` of the font size.
    pub font_px_bits: u32,
    pub oversample: [u32; 2],
    pub size_px: [u32; 2],
    pub padding_px: u32,
}

impl AtlasKey {
    pub fn new(font_bytes: &[u8], config: &AtlasConfig) -> Self {
        Self {
            font_hash: hash_bytes(font_bytes),
            range_start: config.range.start,
            range_end: config.range.end,
            font_px_bits: config.font_px.to_bits(),
            oversample: config.oversample,
            size_px: config.size_px,
            padding_px: config.padding_px,
        }
    }

    /// All fields folded into one 32-bit value, e.g. for a file name.
    pub fn digest(&self) -> u32 {
        let mut bytes = Vec::with_capacity(36);
        bytes.extend_from_slice(&self.font_hash.to_le_bytes());
        bytes.extend_from_slice(&(self.range_start as u32).to_le_bytes());
        bytes.extend_from_slice(&(self.range_end as u32).to_le_bytes());
        bytes.extend_from_slice(&self.font_px_bits.to_le_bytes());
        for v in self.oversample.iter().chain(&self.size_px) {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&self.padding_px.to_le_bytes());
        hash_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GlyphRange;

    #[test]
    fn test_empty_input_hashes_to_zero() {
        assert_eq!(hash_bytes(b""), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(hash_bytes(b"a"), 0xca2e_9442);
        assert_eq!(
            hash_str("The quick brown fox jumps over the lazy dog"),
            0x519e_91f5
        );
    }

    #[test]
    fn test_single_byte_change_changes_hash() {
        assert_ne!(hash_str("abc"), hash_str("abd"));
        assert_eq!(hash_str("abc"), hash_str("abc"));
    }

    #[test]
    fn test_embedded_zero_bytes_count() {
        assert_ne!(hash_bytes(b"a\0b"), hash_bytes(b"ab"));
        assert_ne!(hash_bytes(b"\0"), hash_bytes(b""));
    }

    #[test]
    fn test_high_bytes_are_unsigned() {
        // 0xFF is added as 255, not -1.
        let mut expected: u32 = 255;
        expected = expected.wrapping_add(expected << 10);
        expected ^= expected >> 6;
        expected = expected.wrapping_add(expected << 3);
        expected ^= expected >> 11;
        expected = expected.wrapping_add(expected << 15);
        assert_eq!(hash_bytes(&[0xFF]), expected);
    }

    #[test]
    fn test_atlas_key_tracks_config() {
        let font = b"fake font bytes";
        let base = AtlasConfig::default();
        let a = AtlasKey::new(font, &base);
        let b = AtlasKey::new(font, &base.clone().with_oversample(2, 2));
        let c = AtlasKey::new(b"other font", &base);
        let d = AtlasKey::new(font, &AtlasConfig::new(GlyphRange::new('0', ':'), 32.0));

        assert_eq!(a, AtlasKey::new(font, &base));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest(), AtlasKey::new(font, &base).digest());
    }
}
