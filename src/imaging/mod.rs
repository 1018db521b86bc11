//! Image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, WebP, BMP, TIFF) |
//! | **Orientation** | `kamadak-exif` tag 0x0112 + `DynamicImage` rotate/flip |
//! | **Cover-fit** | `image::imageops::resize` with `Lanczos3` |
//! | **Crop** | `image::imageops::crop_imm` |
//! | **Encode → JPEG, progressive** | `mozjpeg::Compress` |
//! | **Encode → JPEG, baseline** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop geometry (unit testable)
//! - **Parameters**: Targets, quality ranges, codec settings
//! - **Operations**: Geometry transforms on RGB buffers
//! - **Backend**: [`JpegCodec`] trait, [`MozJpegCodec`], [`ImageJpegCodec`] and the
//!   [`StandardJpegCodec`] that routes between them
//! - **Decode**: Loading sources upright in RGB8

pub mod backend;
pub mod calculations;
pub mod decode;
pub mod jpeg_backend;
pub mod mozjpeg_backend;
pub mod operations;
mod params;

pub use backend::{CodecError, JpegCodec};
pub use decode::{DecodeError, load_oriented};
pub use jpeg_backend::{ImageJpegCodec, StandardJpegCodec};
pub use mozjpeg_backend::MozJpegCodec;
pub use operations::{GeometryError, center_square_crop, cover_fit, random_crop};
pub use params::{
    ChromaSubsampling, EncodingConstraint, JpegSettings, Quality, QualityRange, TargetSize,
};
