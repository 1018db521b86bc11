//! Baseline JPEG codec built on the `image` crate, and the production codec pairing.
//!
//! ## Capability mapping
//!
//! | Setting | Supported |
//! |---|---|
//! | Baseline sequential scans | yes |
//! | 4:2:0 chroma subsampling | yes (encoder default for RGB) |
//! | Progressive scans | no |
//! | Optimized Huffman tables | no |
//! | 4:4:4 chroma | no |
//!
//! Requests outside that set fail with
//! [`CodecError::UnsupportedSettings`] before any pixel work, so the bounded
//! encoder can retry at the same quality with [`JpegSettings::BASELINE`].
//! Errors raised by the encoder itself (dimension limits, I/O) are
//! [`CodecError::Failed`] and end the search.
//!
//! [`StandardJpegCodec`] pairs this codec with
//! [`MozJpegCodec`](super::mozjpeg_backend::MozJpegCodec) for the
//! progressive profile.

use super::backend::{CodecError, JpegCodec};
use super::mozjpeg_backend::MozJpegCodec;
use super::params::{ChromaSubsampling, JpegSettings, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// `image::codecs::jpeg::JpegEncoder` behind the [`JpegCodec`] trait.
pub struct ImageJpegCodec;

impl ImageJpegCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageJpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn check_settings(settings: &JpegSettings) -> Result<(), CodecError> {
    if settings.progressive {
        return Err(CodecError::UnsupportedSettings(
            "progressive scans".to_string(),
        ));
    }
    if settings.optimize_huffman {
        return Err(CodecError::UnsupportedSettings(
            "optimized Huffman tables".to_string(),
        ));
    }
    if settings.subsampling != ChromaSubsampling::Quarter {
        return Err(CodecError::UnsupportedSettings(format!(
            "chroma subsampling {:?}",
            settings.subsampling
        )));
    }
    Ok(())
}

impl JpegCodec for ImageJpegCodec {
    fn encode(
        &self,
        image: &RgbImage,
        quality: Quality,
        settings: &JpegSettings,
    ) -> Result<Vec<u8>, CodecError> {
        check_settings(settings)?;

        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.value());
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| CodecError::Failed(e.to_string()))?;
        Ok(buffer)
    }
}

/// Production codec: mozjpeg for progressive profiles, the `image` crate for
/// baseline.
///
/// Routing is by [`JpegSettings::progressive`], so the preferred profile is
/// really produced and the baseline retry still has a codec that can serve it.
pub struct StandardJpegCodec {
    progressive: MozJpegCodec,
    baseline: ImageJpegCodec,
}

impl StandardJpegCodec {
    pub fn new() -> Self {
        Self {
            progressive: MozJpegCodec::new(),
            baseline: ImageJpegCodec::new(),
        }
    }
}

impl Default for StandardJpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl JpegCodec for StandardJpegCodec {
    fn encode(
        &self,
        image: &RgbImage,
        quality: Quality,
        settings: &JpegSettings,
    ) -> Result<Vec<u8>, CodecError> {
        if settings.progressive {
            self.progressive.encode(image, quality, settings)
        } else {
            self.baseline.encode(image, quality, settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_image, noise_image};

    #[test]
    fn encodes_valid_jpeg() {
        let codec = ImageJpegCodec::new();
        let img = gradient_image(64, 48);

        let bytes = codec
            .encode(&img, Quality::new(90), &JpegSettings::BASELINE)
            .unwrap();

        // SOI and EOI markers
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn preferred_profile_is_rejected_as_unsupported() {
        let codec = ImageJpegCodec::new();
        let img = gradient_image(8, 8);

        let err = codec
            .encode(&img, Quality::new(80), &JpegSettings::PREFERRED)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedSettings(_)));
    }

    #[test]
    fn full_chroma_is_rejected_as_unsupported() {
        let codec = ImageJpegCodec::new();
        let settings = JpegSettings {
            subsampling: ChromaSubsampling::Full,
            ..JpegSettings::BASELINE
        };
        let err = codec
            .encode(&gradient_image(8, 8), Quality::new(80), &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedSettings(_)));
    }

    #[test]
    fn oversized_image_is_a_hard_failure() {
        // JPEG frames cannot exceed 65535 pixels per side.
        let img = RgbImage::new(70_000, 1);
        let err = ImageJpegCodec::new()
            .encode(&img, Quality::new(80), &JpegSettings::BASELINE)
            .unwrap_err();
        assert!(matches!(err, CodecError::Failed(_)));
    }

    #[test]
    fn standard_codec_serves_preferred_profile() {
        let bytes = StandardJpegCodec::new()
            .encode(&gradient_image(32, 24), Quality::new(80), &JpegSettings::PREFERRED)
            .unwrap();
        // SOF2: progressive DCT frame
        assert!(bytes.windows(2).any(|w| w == [0xFF, 0xC2]));
    }

    #[test]
    fn standard_codec_serves_baseline_profile() {
        let bytes = StandardJpegCodec::new()
            .encode(&gradient_image(32, 24), Quality::new(80), &JpegSettings::BASELINE)
            .unwrap();
        // SOF0: baseline DCT frame
        assert!(bytes.windows(2).any(|w| w == [0xFF, 0xC0]));
        assert!(!bytes.windows(2).any(|w| w == [0xFF, 0xC2]));
    }

    #[test]
    fn higher_quality_is_larger() {
        let codec = ImageJpegCodec::new();
        let img = noise_image(128, 128, 5);

        let low = codec
            .encode(&img, Quality::new(20), &JpegSettings::BASELINE)
            .unwrap();
        let high = codec
            .encode(&img, Quality::new(95), &JpegSettings::BASELINE)
            .unwrap();
        assert!(high.len() > low.len());
    }
}
