//! Pure calculation functions for crop geometry.
//!
//! All functions here are pure and testable without any I/O or pixel buffers.
//! Randomness is passed in as an explicit [`Rng`] so tests can seed it.

use super::params::TargetSize;
use rand::Rng;

/// Dimensions after the minimum uniform upscale that covers `target`.
///
/// Returns `source` unchanged when it already covers the target. Otherwise
/// scales both sides by `max(tw / w, th / h)` and rounds to the nearest pixel.
///
/// # Examples
/// ```
/// # use cropper::imaging::calculations::cover_fit_dimensions;
/// # use cropper::imaging::TargetSize;
/// // 300x300 needs 512/300 to reach a 512x512 square
/// assert_eq!(cover_fit_dimensions((300, 300), TargetSize::square(512)), (512, 512));
/// ```
pub fn cover_fit_dimensions(source: (u32, u32), target: TargetSize) -> (u32, u32) {
    let (w, h) = source;
    let scale = cover_scale(source, target);
    if scale <= 1.0 {
        return (w, h);
    }
    // Rounding cannot land below the target, the max() only absorbs float noise.
    let new_w = ((w as f64 * scale).round() as u32).max(target.width);
    let new_h = ((h as f64 * scale).round() as u32).max(target.height);
    (new_w, new_h)
}

/// Scale factor needed to cover `target`. Values `<= 1.0` mean no resize.
pub fn cover_scale(source: (u32, u32), target: TargetSize) -> f64 {
    let (w, h) = source;
    let sx = target.width as f64 / w as f64;
    let sy = target.height as f64 / h as f64;
    sx.max(sy)
}

/// Uniformly random crop origin such that the crop stays in bounds.
///
/// Each axis picks from `0..=(source - target)`, collapsing to 0 when the
/// dimension matches exactly. `source` must already cover `target`.
pub fn random_origin<R: Rng + ?Sized>(
    source: (u32, u32),
    target: TargetSize,
    rng: &mut R,
) -> (u32, u32) {
    let max_x = source.0.saturating_sub(target.width);
    let max_y = source.1.saturating_sub(target.height);
    (rng.gen_range(0..=max_x), rng.gen_range(0..=max_y))
}

/// Origin of a `size` x `size` square centered on the image.
///
/// Clamped so the square never extends past the right or bottom edge.
pub fn centered_origin(source: (u32, u32), size: u32) -> (u32, u32) {
    let (w, h) = source;
    let half = size / 2;
    let clamp_axis = |len: u32| {
        let start = (len / 2).saturating_sub(half);
        if start + size > len {
            len.saturating_sub(size)
        } else {
            start
        }
    };
    (clamp_axis(w), clamp_axis(h))
}
