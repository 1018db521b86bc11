//! Source image decoding with EXIF orientation correction.
//!
//! Orientation is read from the raw container bytes with `kamadak-exif`, the
//! pixels are decoded by the `image` crate, rotated/flipped upright, and
//! converted to RGB8 (alpha dropped).

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// Load an image from disk, upright and in RGB8.
pub fn load_oriented(path: &Path) -> Result<RgbImage, DecodeError> {
    let bytes = std::fs::read(path)?;
    let orientation = read_orientation(&bytes);

    let img = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()?
        .decode()
        .map_err(|e| DecodeError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if orientation != 1 {
        tracing::debug!(orientation, path = %path.display(), "applying EXIF orientation");
    }
    Ok(apply_orientation(img, orientation).into_rgb8())
}

/// EXIF orientation tag (1–8). Missing or unreadable EXIF counts as 1.
pub fn read_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|f| f.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// Rotate/flip so the image displays upright.
///
/// 1 = normal, 2 = mirrored, 3 = 180°, 4 = flipped vertically,
/// 5 = mirrored + 90° CW, 6 = 90° CW, 7 = mirrored + 270° CW, 8 = 270° CW.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
