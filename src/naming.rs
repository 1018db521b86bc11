//! Output file naming.
//!
//! Every output is named after its source stem plus a fixed suffix:
//!
//! ```text
//! photo.jpg  →  photo_crop.jpg   (main 4096x2304 crop)
//!            →  photo_logo.jpg   (512x512 square)
//! ```
//!
//! ## Collisions
//!
//! Existing files are never overwritten. When `photo_crop.jpg` is taken the
//! next free name in `photo_crop_1.jpg`, `photo_crop_2.jpg`, … is used. The
//! check happens at call time and is not locked against other writers.
//!
//! ## Processed marker
//!
//! Folder selection skips any file whose stem contains [`CROP_SUFFIX`], so
//! earlier outputs dropped back into the input folder are not cropped again.
//! This also skips unrelated files such as `my_crop_circle.png`.

use std::path::{Path, PathBuf};

/// Suffix of the main rectangular output, also the "already processed" marker.
pub const CROP_SUFFIX: &str = "_crop";
/// Suffix of the square logo output.
pub const LOGO_SUFFIX: &str = "_logo";
/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Output path for the main crop of `base_name`.
pub fn crop_output_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}{CROP_SUFFIX}.{OUTPUT_EXTENSION}"))
}

/// Output path for the logo of `base_name`.
pub fn logo_output_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}{LOGO_SUFFIX}.{OUTPUT_EXTENSION}"))
}

/// Whether a file stem looks like one of our own outputs.
pub fn is_processed_stem(stem: &str) -> bool {
    stem.contains(CROP_SUFFIX)
}

/// Return `path` if free, otherwise the first free `stem_N.ext` with N ≥ 1.
pub fn non_clobber_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut i: u64 = 1;
    loop {
        let candidate = path.with_file_name(format!("{stem}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn crop_and_logo_names() {
        let dir = Path::new("/out");
        assert_eq!(crop_output_path(dir, "photo"), Path::new("/out/photo_crop.jpg"));
        assert_eq!(logo_output_path(dir, "photo"), Path::new("/out/photo_logo.jpg"));
    }

    #[test]
    fn processed_marker_matches_anywhere_in_stem() {
        assert!(is_processed_stem("photo_crop"));
        assert!(is_processed_stem("photo_crop_3"));
        assert!(is_processed_stem("my_crop_circle"));
        assert!(!is_processed_stem("photo"));
        assert!(!is_processed_stem("photo_logo"));
        assert!(!is_processed_stem("cropped"));
    }

    #[test]
    fn free_path_is_returned_as_is() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("photo_crop.jpg");
        assert_eq!(non_clobber_path(&p), p);
    }

    #[test]
    fn taken_path_gets_numeric_suffix() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("photo_crop.jpg");
        std::fs::write(&p, b"x").unwrap();
        assert_eq!(non_clobber_path(&p), tmp.path().join("photo_crop_1.jpg"));
    }

    #[test]
    fn suffix_skips_taken_numbers() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "a_1.jpg", "a_2.jpg"] {
            std::fs::write(tmp.path().join(name), b"x").unwrap();
        }
        assert_eq!(
            non_clobber_path(&tmp.path().join("a.jpg")),
            tmp.path().join("a_3.jpg")
        );
    }

    #[test]
    fn repeated_resolution_yields_distinct_paths() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("photo_crop.jpg");
        std::fs::write(&p, b"x").unwrap();

        let first = non_clobber_path(&p);
        std::fs::write(&first, b"y").unwrap();
        let second = non_clobber_path(&p);

        assert_ne!(first, second);
        assert!(!second.exists());
        assert_eq!(second, tmp.path().join("photo_crop_2.jpg"));
    }

    #[test]
    fn path_without_extension() {
        let tmp = TempDir::new().unwrap();
        let p = tmp.path().join("noext");
        std::fs::write(&p, b"x").unwrap();
        assert_eq!(non_clobber_path(&p), tmp.path().join("noext_1"));
    }
}
