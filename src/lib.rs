//! # Cropper
//!
//! Turns an arbitrary photo into a 4096x2304 wallpaper crop and a 512x512
//! centered logo, each re-encoded as a JPEG that fits under a hard byte budget
//! (1,000,000 bytes by default).
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! 1. Select   folder or file   →  source path        (scan)
//! 2. Decode   source path      →  oriented RGB        (imaging::decode)
//! 3. Crop     RGB              →  exact-size buffers  (imaging::operations)
//! 4. Encode   buffer           →  JPEG under budget   (encode)
//! 5. Write    JPEG             →  name_crop.jpg, ...  (encode + naming)
//! ```
//!
//! Randomness (which file, where to crop) is passed in as an explicit
//! [`rand::Rng`], so every stage can be tested deterministically with a seeded
//! generator.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Candidate listing, random selection, validation of a chosen file |
//! | [`imaging`] | Geometry math, crop/resize operations, decoding, the JPEG codec seam |
//! | [`encode`] | Quality binary search under the byte budget, no-clobber writes |
//! | [`naming`] | `_crop` / `_logo` output names, collision-free path resolution |
//! | [`process`] | The pipeline above plus the error taxonomy the CLI reports |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`state`] | Last-used folders and flags, remembered between runs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Highest Quality That Fits
//!
//! Quality is found by binary search over 40–95, then 10–39 if nothing fits.
//! JPEG size grows with quality for a fixed image, so the search lands on the
//! highest quality in range under the budget in about six encodes. If even
//! quality 10 is too large the run fails instead of writing an oversized file.
//!
//! ## Preferred Profile With Baseline Fallback
//!
//! Each attempt first asks the codec for progressive, Huffman-optimized, 4:2:0
//! output. A codec that can't do that reports
//! [`CodecError::UnsupportedSettings`](imaging::CodecError::UnsupportedSettings)
//! and the same quality is retried as baseline. The production
//! [`StandardJpegCodec`](imaging::StandardJpegCodec) writes the progressive
//! profile with mozjpeg and baseline with the `image` crate's encoder.
//!
//! ## Never Overwrite
//!
//! Outputs go through a temp file in the destination folder and are persisted
//! with a no-clobber rename. A name that appears between path resolution and the
//! rename is handled by picking the next `_N` suffix.

pub mod config;
pub mod encode;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;
