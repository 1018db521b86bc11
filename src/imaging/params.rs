//! Parameter types for image operations.
//!
//! These structs describe *what* to produce, not *how*. They are the interface
//! between the pipeline in [`process`](crate::process) (which decides which
//! outputs to create) and the encoder/codec layer (which does the byte work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100). Clamped on construction.
//! - [`QualityRange`]: Inclusive quality bounds searched by the bounded encoder.
//! - [`EncodingConstraint`]: Byte budget plus the primary and fallback ranges.
//! - [`TargetSize`]: Exact output pixel dimensions.
//! - [`JpegSettings`]: Fixed codec options besides quality (preferred and baseline profiles).

use serde::{Deserialize, Serialize};

/// Quality setting for JPEG encoding (1-100).
///
/// Only constructible through [`Quality::new`], so the value is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Inclusive range of JPEG qualities, e.g. `40..=95`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 2]", into = "[u8; 2]")]
pub struct QualityRange {
    pub floor: u8,
    pub ceiling: u8,
}

impl QualityRange {
    pub const fn new(floor: u8, ceiling: u8) -> Self {
        Self { floor, ceiling }
    }

    /// Range searched first.
    pub const PRIMARY: QualityRange = QualityRange::new(40, 95);

    /// Range searched when nothing in [`Self::PRIMARY`] fits the budget.
    pub const FALLBACK: QualityRange = QualityRange::new(10, 39);

    pub fn is_valid(&self) -> bool {
        (1..=100).contains(&self.floor) && (1..=100).contains(&self.ceiling) && self.floor <= self.ceiling
    }
}

impl From<[u8; 2]> for QualityRange {
    fn from([floor, ceiling]: [u8; 2]) -> Self {
        Self { floor, ceiling }
    }
}

impl From<QualityRange> for [u8; 2] {
    fn from(range: QualityRange) -> Self {
        [range.floor, range.ceiling]
    }
}

/// Byte budget and the quality ranges searched to meet it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConstraint {
    pub max_bytes: u64,
    pub primary: QualityRange,
    pub fallback: QualityRange,
}

impl Default for EncodingConstraint {
    fn default() -> Self {
        Self {
            max_bytes: 1_000_000,
            primary: QualityRange::PRIMARY,
            fallback: QualityRange::FALLBACK,
        }
    }
}

/// Exact output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }
}

/// Chroma subsampling layout written by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaSubsampling {
    /// 4:4:4, no chroma reduction.
    Full,
    /// 4:2:0, chroma halved in both directions.
    Quarter,
}

/// Codec options besides quality. Not part of the quality search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegSettings {
    pub progressive: bool,
    pub optimize_huffman: bool,
    pub subsampling: ChromaSubsampling,
}

impl JpegSettings {
    /// Preferred profile: progressive scans, optimized Huffman tables, 4:2:0.
    pub const PREFERRED: JpegSettings = JpegSettings {
        progressive: true,
        optimize_huffman: true,
        subsampling: ChromaSubsampling::Quarter,
    };

    /// Plain profile every JPEG codec can write.
    pub const BASELINE: JpegSettings = JpegSettings {
        progressive: false,
        optimize_huffman: false,
        subsampling: ChromaSubsampling::Quarter,
    };
}
