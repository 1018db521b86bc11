//! Geometry transforms on decoded RGB buffers.
//!
//! These functions combine the pure math in
//! [`calculations`](super::calculations) with the `image` crate's resampling and
//! cropping. Every function returns a new buffer; the input is never mutated.

use super::calculations::{centered_origin, cover_fit_dimensions, random_origin};
use super::params::TargetSize;
use image::RgbImage;
use image::imageops::{self, FilterType};
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("target has zero size ({width}x{height})")]
    EmptyTarget { width: u32, height: u32 },
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeometryError>;

fn check_sizes(image: &RgbImage, target: TargetSize) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(GeometryError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    if target.width == 0 || target.height == 0 {
        return Err(GeometryError::EmptyTarget {
            width: target.width,
            height: target.height,
        });
    }
    Ok(())
}

/// Upscale with Lanczos3 until the image covers `target`.
///
/// Never downscales. An image that already covers the target comes back as an
/// unchanged copy.
pub fn cover_fit(image: &RgbImage, target: TargetSize) -> Result<RgbImage> {
    check_sizes(image, target)?;
    let (w, h) = cover_fit_dimensions(image.dimensions(), target);
    if (w, h) == image.dimensions() {
        return Ok(image.clone());
    }
    tracing::debug!(
        from_width = image.width(),
        from_height = image.height(),
        to_width = w,
        to_height = h,
        "upscaling to cover target"
    );
    Ok(imageops::resize(image, w, h, FilterType::Lanczos3))
}

/// Cut a `target`-sized rectangle at a uniformly random position.
///
/// Images smaller than the target are cover-fitted first.
pub fn random_crop<R: Rng + ?Sized>(
    image: &RgbImage,
    target: TargetSize,
    rng: &mut R,
) -> Result<RgbImage> {
    let covered = cover_fit(image, target)?;
    let (x0, y0) = random_origin(covered.dimensions(), target, rng);
    tracing::debug!(x0, y0, "random crop origin");
    Ok(imageops::crop_imm(&covered, x0, y0, target.width, target.height).to_image())
}

/// Cut a centered `size` x `size` square, cover-fitting first if needed.
pub fn center_square_crop(image: &RgbImage, size: u32) -> Result<RgbImage> {
    let target = TargetSize::square(size);
    let covered = cover_fit(image, target)?;
    let (x0, y0) = centered_origin(covered.dimensions(), size);
    Ok(imageops::crop_imm(&covered, x0, y0, size, size).to_image())
}
