//! Progressive JPEG codec built on `mozjpeg`.
//!
//! ## Capability mapping
//!
//! | Setting | Supported |
//! |---|---|
//! | Progressive scans | yes |
//! | Optimized Huffman tables | yes (on or off) |
//! | 4:2:0 / 4:4:4 chroma | yes |
//! | Baseline sequential scans | no |
//!
//! mozjpeg's defaults already lean progressive, so baseline requests are
//! rejected with [`CodecError::UnsupportedSettings`] and left to
//! [`ImageJpegCodec`](super::jpeg_backend::ImageJpegCodec).

use super::backend::{CodecError, JpegCodec};
use super::params::{ChromaSubsampling, JpegSettings, Quality};
use image::RgbImage;
use mozjpeg::{ColorSpace, Compress};

/// `mozjpeg::Compress` behind the [`JpegCodec`] trait.
pub struct MozJpegCodec;

impl MozJpegCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MozJpegCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn failed(stage: &str, e: std::io::Error) -> CodecError {
    CodecError::Failed(format!("mozjpeg: failed to {stage}: {e}"))
}

impl JpegCodec for MozJpegCodec {
    fn encode(
        &self,
        image: &RgbImage,
        quality: Quality,
        settings: &JpegSettings,
    ) -> Result<Vec<u8>, CodecError> {
        if !settings.progressive {
            return Err(CodecError::UnsupportedSettings(
                "baseline sequential scans".to_string(),
            ));
        }

        let (w, h) = image.dimensions();
        let mut comp = Compress::new(ColorSpace::JCS_RGB);
        comp.set_size(w as usize, h as usize);
        comp.set_color_space(ColorSpace::JCS_YCbCr);
        comp.set_quality(f32::from(quality.value()));

        let chroma = match settings.subsampling {
            ChromaSubsampling::Quarter => (2, 2),
            ChromaSubsampling::Full => (1, 1),
        };
        comp.set_chroma_sampling_pixel_sizes(chroma, chroma);
        comp.set_progressive_mode();
        comp.set_optimize_coding(settings.optimize_huffman);

        let mut started = comp
            .start_compress(Vec::new())
            .map_err(|e| failed("start compress", e))?;
        started
            .write_scanlines(image.as_raw())
            .map_err(|e| failed("write scanlines", e))?;
        started.finish().map_err(|e| failed("finish", e))
    }
}
