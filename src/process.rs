//! Crop pipeline.
//!
//! Ties source selection, decoding, geometry and the bounded encoder together:
//!
//! ```text
//! folder ─select─▶ source ─decode+orient─▶ RGB ─┬─ cover-fit + random crop ─▶ name_crop.jpg
//!                                               └─ centered square crop ───▶ name_logo.jpg
//! ```
//!
//! Each output is encoded as the highest-quality JPEG that fits the byte
//! budget (see [`encode`](crate::encode)) and written under a collision-safe
//! name.
//!
//! ## Outputs
//!
//! ```text
//! output/
//! ├── beach_crop.jpg      # 4096x2304, ≤ 1,000,000 bytes
//! ├── beach_logo.jpg      # 512x512,   ≤ 1,000,000 bytes
//! └── beach_crop_1.jpg    # second run on the same source, nothing overwritten
//! ```
//!
//! The main crop is written before the logo is encoded. If the logo then fails,
//! the main crop stays on disk and the error is returned.

use crate::config::CropConfig;
use crate::encode::{Artifact, EncodeError, write_artifact};
use crate::imaging::{
    DecodeError, GeometryError, JpegCodec, StandardJpegCodec, center_square_crop, load_oriented,
    random_crop,
};
use crate::naming::{crop_output_path, logo_output_path};
use crate::scan::{ScanError, select_random_image, validate_selected_file};
use image::RgbImage;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("Could not read source image: {0}")]
    Decode(#[from] DecodeError),
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Broad failure categories the shell reports differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No eligible images, missing or unsupported file: the user can fix it.
    Input,
    /// Nothing in either quality range fits the byte budget.
    Budget,
    /// Reading the source or writing the output failed.
    Io,
    /// Anything else: codec or geometry failures.
    Internal,
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProcessError::Scan(ScanError::Io(_)) => ErrorKind::Io,
            ProcessError::Scan(_) => ErrorKind::Input,
            ProcessError::Decode(DecodeError::Io(_)) => ErrorKind::Io,
            ProcessError::Decode(DecodeError::Decode { .. }) => ErrorKind::Input,
            ProcessError::Encode(EncodeError::BudgetExceeded { .. }) => ErrorKind::Budget,
            ProcessError::Encode(EncodeError::Io(_)) => ErrorKind::Io,
            ProcessError::Encode(EncodeError::Codec(_)) => ErrorKind::Internal,
            ProcessError::Geometry(_) => ErrorKind::Internal,
        }
    }
}

/// What one run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub source: PathBuf,
    pub main: Artifact,
    pub logo: Option<Artifact>,
}

/// Produce the main crop only.
pub fn produce_main_only<R: Rng + ?Sized>(
    codec: &impl JpegCodec,
    image: &RgbImage,
    base_name: &str,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<Artifact, ProcessError> {
    let cropped = random_crop(image, config.main_target(), rng)?;
    let artifact = write_artifact(
        codec,
        &cropped,
        &crop_output_path(output_dir, base_name),
        &config.constraint(),
    )?;
    Ok(artifact)
}

/// Produce the main crop and the square logo.
pub fn produce_main_and_logo<R: Rng + ?Sized>(
    codec: &impl JpegCodec,
    image: &RgbImage,
    base_name: &str,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<(Artifact, Artifact), ProcessError> {
    let main = produce_main_only(codec, image, base_name, output_dir, config, rng)?;

    let logo_img = center_square_crop(image, config.logo.size)?;
    let logo = write_artifact(
        codec,
        &logo_img,
        &logo_output_path(output_dir, base_name),
        &config.constraint(),
    )?;
    Ok((main, logo))
}

fn produce_from_source<R: Rng + ?Sized>(
    codec: &impl JpegCodec,
    source: &Path,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<RunReport, ProcessError> {
    let image = load_oriented(source)?;
    let base_name = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    tracing::info!(
        source = %source.display(),
        width = image.width(),
        height = image.height(),
        "processing"
    );

    let (main, logo) = if config.logo.enabled {
        let (main, logo) =
            produce_main_and_logo(codec, &image, &base_name, output_dir, config, rng)?;
        (main, Some(logo))
    } else {
        let main = produce_main_only(codec, &image, &base_name, output_dir, config, rng)?;
        (main, None)
    };

    Ok(RunReport {
        source: source.to_path_buf(),
        main,
        logo,
    })
}

/// Pick a random image from `input_dir` and crop it into `output_dir`.
pub fn process_random<R: Rng + ?Sized>(
    input_dir: &Path,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<RunReport, ProcessError> {
    process_random_with_codec(&StandardJpegCodec::new(), input_dir, output_dir, config, rng)
}

/// [`process_random`] with a specific codec (allows testing with a mock).
pub fn process_random_with_codec<R: Rng + ?Sized>(
    codec: &impl JpegCodec,
    input_dir: &Path,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<RunReport, ProcessError> {
    let source = select_random_image(input_dir, rng)?;
    produce_from_source(codec, &source, output_dir, config, rng)
}

/// Crop a user-selected file into `output_dir`.
pub fn process_selected<R: Rng + ?Sized>(
    file: &Path,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<RunReport, ProcessError> {
    process_selected_with_codec(&StandardJpegCodec::new(), file, output_dir, config, rng)
}

/// [`process_selected`] with a specific codec (allows testing with a mock).
pub fn process_selected_with_codec<R: Rng + ?Sized>(
    codec: &impl JpegCodec,
    file: &Path,
    output_dir: &Path,
    config: &CropConfig,
    rng: &mut R,
) -> Result<RunReport, ProcessError> {
    validate_selected_file(file)?;
    produce_from_source(codec, file, output_dir, config, rng)
}
