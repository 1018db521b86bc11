//! Size-bounded JPEG encoding.
//!
//! Finds the highest JPEG quality whose output fits a byte budget and writes
//! that candidate to disk exactly once.
//!
//! ## Search
//!
//! Quality is searched with a binary search over an inclusive range. Encoded
//! size grows with quality, so every passing midpoint raises the floor and
//! every failing one lowers the ceiling:
//!
//! ```text
//! primary  40..=95   →  best passing quality, or
//! fallback 10..=39   →  best passing quality, or
//! BudgetExceeded
//! ```
//!
//! ## Codec profile
//!
//! Each attempt first asks the codec for [`JpegSettings::PREFERRED`]. If the
//! codec answers [`CodecError::UnsupportedSettings`] the same quality is
//! encoded again with [`JpegSettings::BASELINE`]. Other codec errors abort.
//!
//! ## Writing
//!
//! The winning bytes go to a temporary file in the destination directory and
//! are then persisted under a [collision-safe](crate::naming::non_clobber_path)
//! name without overwriting anything. A failed write leaves no output file.

use crate::imaging::{
    CodecError, EncodingConstraint, JpegCodec, JpegSettings, Quality, QualityRange,
};
use crate::naming::non_clobber_path;
use image::RgbImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Persist attempts before giving up on a destination that keeps appearing.
const MAX_PERSIST_ATTEMPTS: u32 = 16;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("JPEG codec error: {0}")]
    Codec(#[from] CodecError),
    #[error(
        "could not fit under {max_bytes} bytes even at the lowest quality (smallest was {smallest} bytes)"
    )]
    BudgetExceeded { max_bytes: u64, smallest: u64 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An in-memory encoding that passed the budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub bytes: Vec<u8>,
    pub quality: Quality,
}

/// A written output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// File size in bytes.
    pub bytes: u64,
    pub quality: Quality,
    pub width: u32,
    pub height: u32,
}

/// Outcome of searching a single quality range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Option<Candidate>,
    /// Smallest encoded size seen, passing or not.
    pub smallest: Option<u64>,
}

/// Binary search for the highest quality in `range` whose encoding fits `max_bytes`.
///
/// `encode` is called once per step with the midpoint quality. Errors from
/// `encode` abort the search.
pub fn search_quality<E>(
    range: QualityRange,
    max_bytes: u64,
    mut encode: impl FnMut(Quality) -> Result<Vec<u8>, E>,
) -> Result<SearchOutcome, E> {
    let mut low = i32::from(range.floor);
    let mut high = i32::from(range.ceiling);
    let mut best: Option<Candidate> = None;
    let mut smallest: Option<u64> = None;

    while low <= high {
        let mid = (low + high) / 2;
        let quality = Quality::new(mid as u8);
        let bytes = encode(quality)?;
        let size = bytes.len() as u64;
        smallest = Some(smallest.map_or(size, |s| s.min(size)));

        if size <= max_bytes {
            tracing::debug!(quality = mid, size, max_bytes, "fits");
            best = Some(Candidate { bytes, quality });
            low = mid + 1;
        } else {
            tracing::debug!(quality = mid, size, max_bytes, "too large");
            high = mid - 1;
        }
    }

    Ok(SearchOutcome { best, smallest })
}

/// Encode at `quality`, falling back to the baseline profile if the codec
/// rejects the preferred one.
pub fn encode_with_profile(
    codec: &impl JpegCodec,
    image: &RgbImage,
    quality: Quality,
) -> Result<Vec<u8>, CodecError> {
    match codec.encode(image, quality, &JpegSettings::PREFERRED) {
        Err(CodecError::UnsupportedSettings(reason)) => {
            tracing::debug!(%reason, quality = quality.value(), "retrying with baseline settings");
            codec.encode(image, quality, &JpegSettings::BASELINE)
        }
        other => other,
    }
}

/// Find the best candidate under the budget, trying the fallback range if needed.
pub fn encode_within_budget(
    codec: &impl JpegCodec,
    image: &RgbImage,
    constraint: &EncodingConstraint,
) -> Result<Candidate, EncodeError> {
    let mut smallest: Option<u64> = None;

    for range in [constraint.primary, constraint.fallback] {
        let outcome = search_quality(range, constraint.max_bytes, |q| {
            encode_with_profile(codec, image, q)
        })?;
        if let Some(best) = outcome.best {
            tracing::info!(
                quality = best.quality.value(),
                size = best.bytes.len(),
                "selected JPEG quality"
            );
            return Ok(best);
        }
        smallest = match (smallest, outcome.smallest) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        tracing::debug!(
            floor = range.floor,
            ceiling = range.ceiling,
            "no quality in range fits the budget"
        );
    }

    Err(EncodeError::BudgetExceeded {
        max_bytes: constraint.max_bytes,
        smallest: smallest.unwrap_or(0),
    })
}

/// Write `bytes` to a collision-safe variant of `desired`.
///
/// Creates the parent directory if needed. Never overwrites an existing file.
/// Returns the path actually written.
pub fn write_no_clobber(desired: &Path, bytes: &[u8]) -> std::io::Result<PathBuf> {
    let dir = match desired.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;

    let mut attempts = 0;
    loop {
        let path = non_clobber_path(desired);
        match tmp.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                attempts += 1;
                if attempts >= MAX_PERSIST_ATTEMPTS {
                    return Err(e.error);
                }
                // Another writer took the name between the check and the rename.
                tracing::warn!(path = %path.display(), "destination appeared during write, retrying");
                tmp = e.file;
            }
            Err(e) => return Err(e.error),
        }
    }
}

/// Encode `image` under the budget and write it next to `desired`.
pub fn write_artifact(
    codec: &impl JpegCodec,
    image: &RgbImage,
    desired: &Path,
    constraint: &EncodingConstraint,
) -> Result<Artifact, EncodeError> {
    let candidate = encode_within_budget(codec, image, constraint)?;
    let path = write_no_clobber(desired, &candidate.bytes)?;
    tracing::info!(path = %path.display(), size = candidate.bytes.len(), "wrote artifact");

    Ok(Artifact {
        path,
        bytes: candidate.bytes.len() as u64,
        quality: candidate.quality,
        width: image.width(),
        height: image.height(),
    })
}
