//! Source selection.
//!
//! Two ways to pick the image that gets cropped:
//!
//! - **Random**: list the regular files directly inside a folder (no
//!   recursion), keep supported image types that are not earlier outputs, and
//!   pick one uniformly at random.
//! - **Selected**: validate a single user-chosen path.
//!
//! ## Supported Inputs
//!
//! `jpg`, `jpeg`, `png`, `webp`, `bmp`, `tif`, `tiff`, matched case-insensitively.
//! Anything whose stem carries the [`CROP_SUFFIX`](crate::naming::CROP_SUFFIX)
//! marker is treated as already processed and skipped.

use crate::naming::is_processed_stem;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Input extensions with a compiled-in decoder.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No suitable images found in {0}")]
    NoImages(PathBuf),
    #[error("Selected file does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Selected file is not a supported image: {0}")]
    UnsupportedType(PathBuf),
}

/// Whether the extension of `path` is one we can decode.
pub fn has_supported_extension(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

fn is_candidate(path: &Path) -> bool {
    if !path.is_file() || !has_supported_extension(path) {
        return false;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    !is_processed_stem(&stem)
}

/// Every eligible image directly inside `folder`, sorted by path.
pub fn list_candidates(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if is_candidate(&path) {
            images.push(path);
        }
    }

    images.sort();
    Ok(images)
}

/// Pick one eligible image from `folder` uniformly at random.
pub fn select_random_image<R: Rng + ?Sized>(
    folder: &Path,
    rng: &mut R,
) -> Result<PathBuf, ScanError> {
    let images = list_candidates(folder)?;
    tracing::debug!(folder = %folder.display(), count = images.len(), "eligible images");
    images
        .choose(rng)
        .cloned()
        .ok_or_else(|| ScanError::NoImages(folder.to_path_buf()))
}

/// Check that a user-picked path is an existing file of a supported type.
pub fn validate_selected_file(path: &Path) -> Result<(), ScanError> {
    if !path.is_file() {
        return Err(ScanError::NotFound(path.to_path_buf()));
    }
    if !has_supported_extension(path) {
        return Err(ScanError::UnsupportedType(path.to_path_buf()));
    }
    Ok(())
}
