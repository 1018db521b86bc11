//! JPEG codec trait and shared types.
//!
//! The [`JpegCodec`] trait is the seam between the bounded encoder (which owns
//! the quality search) and the library that produces JPEG bytes. The
//! production implementation is
//! [`ImageJpegCodec`](super::jpeg_backend::ImageJpegCodec), built on the
//! `image` crate. Tests swap in a mock whose output size is a known function
//! of quality.

use super::params::{JpegSettings, Quality};
use image::RgbImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    /// The codec cannot honor the requested [`JpegSettings`]. The caller may
    /// retry the same quality with a plainer profile.
    #[error("Unsupported encoder settings: {0}")]
    UnsupportedSettings(String),
    #[error("Encoding failed: {0}")]
    Failed(String),
}

/// A JPEG encoder that writes into memory.
///
/// Implementations must be deterministic for a given image, quality and
/// settings; the quality search relies on size growing with quality.
pub trait JpegCodec {
    fn encode(
        &self,
        image: &RgbImage,
        quality: Quality,
        settings: &JpegSettings,
    ) -> Result<Vec<u8>, CodecError>;
}
