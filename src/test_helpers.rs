//! Shared test utilities for the cropper test suite.
//!
//! Synthetic images with predictable content, plus helpers that put them on
//! disk so scan/decode/process tests don't need checked-in fixtures.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_png(tmp.path(), "beach.png", 120, 80);
//! let img = load_oriented(&path).unwrap();
//! assert_eq!(img, gradient_image(120, 80));
//! ```

use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic images
// =========================================================================

/// Smooth gradient whose pixels encode their position.
///
/// Compresses well, and any crop or flip is detectable by inspecting a
/// corner pixel.
pub fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) % 256) as u8;
        Rgb([r, g, b])
    })
}

/// Seeded random noise. Compresses badly, which makes budgets bite.
pub fn noise_image(width: u32, height: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbImage::from_fn(width, height, |_, _| Rgb([rng.r#gen(), rng.r#gen(), rng.r#gen()]))
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write a [`gradient_image`] as PNG (lossless, so decode is exact).
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient_image(width, height).save(&path).unwrap();
    path
}

fn gradient_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    use image::codecs::jpeg::JpegEncoder;

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode_image(&gradient_image(width, height))
        .unwrap();
    bytes
}

/// Write a [`gradient_image`] as JPEG at quality 90.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, gradient_jpeg_bytes(width, height)).unwrap();
    path
}

/// APP1 segment holding a big-endian TIFF with a single Orientation entry.
fn exif_orientation_segment(orientation: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"Exif\0\0");
    // TIFF header: "MM", magic 42, first IFD at offset 8
    payload.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    // One IFD entry: tag 0x0112, type SHORT, count 1, value left-aligned
    payload.extend_from_slice(&[0x00, 0x01]);
    payload.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    // No next IFD
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let len = (payload.len() + 2) as u16;
    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&len.to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Write a [`gradient_image`] JPEG carrying an EXIF orientation tag.
///
/// `width` x `height` are the stored pixel dimensions, before orientation.
pub fn write_jpeg_with_orientation(
    dir: &Path,
    name: &str,
    width: u32,
    height: u32,
    orientation: u16,
) -> PathBuf {
    let jpeg = gradient_jpeg_bytes(width, height);
    // Splice the APP1 segment right after SOI.
    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&exif_orientation_segment(orientation));
    bytes.extend_from_slice(&jpeg[2..]);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
