//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Success
//!
//! ```text
//! beach
//!     Source: /photos/inbox/beach.jpg
//!     Main: /photos/out/beach_crop.jpg (4096x2304, 912.4 KB, quality 83)
//!     Logo: /photos/out/beach_logo.jpg (512x512, 61.0 KB, quality 95)
//! ```
//!
//! ## Failure
//!
//! ```text
//! Error: no images found in /photos/inbox
//!     Add .jpg, .png, .webp, .bmp or .tif files that are not already crops.
//! ```
//!
//! # Architecture
//!
//! Each result has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure.

use crate::encode::Artifact;
use crate::process::{ErrorKind, ProcessError, RunReport};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Human-readable size. Uses 1000-byte units to match the byte budget.
fn format_size(bytes: u64) -> String {
    if bytes < 1_000 {
        format!("{} B", bytes)
    } else if bytes < 1_000_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{:.2} MB", bytes as f64 / 1_000_000.0)
    }
}

/// One artifact line.
///
/// ```text
/// Main: out/beach_crop.jpg (4096x2304, 912.4 KB, quality 83)
/// ```
pub fn format_artifact(label: &str, artifact: &Artifact) -> String {
    format!(
        "{}: {} ({}x{}, {}, quality {})",
        label,
        artifact.path.display(),
        artifact.width,
        artifact.height,
        format_size(artifact.bytes),
        artifact.quality.value()
    )
}

/// Format the result of a successful run.
pub fn format_run_report(report: &RunReport) -> Vec<String> {
    let title = report
        .source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.source.display().to_string());

    let mut lines = vec![title];
    lines.push(format!("{}Source: {}", indent(1), report.source.display()));
    lines.push(format!("{}{}", indent(1), format_artifact("Main", &report.main)));
    if let Some(ref logo) = report.logo {
        lines.push(format!("{}{}", indent(1), format_artifact("Logo", logo)));
    }
    lines
}

/// Print a run report to stdout.
pub fn print_run_report(report: &RunReport) {
    for line in format_run_report(report) {
        println!("{}", line);
    }
}

/// Error line plus a hint tailored to the failure kind.
pub fn format_error(err: &ProcessError) -> Vec<String> {
    let hint = match err.kind() {
        ErrorKind::Input => {
            "Add .jpg, .png, .webp, .bmp or .tif files that are not already crops."
        }
        ErrorKind::Budget => "Try a different image.",
        ErrorKind::Io => "Check that the folders exist and are writable.",
        ErrorKind::Internal => "This is a bug in cropper.",
    };
    vec![format!("Error: {}", err), format!("{}{}", indent(1), hint)]
}

/// Print a processing error to stderr.
pub fn print_error(err: &ProcessError) {
    for line in format_error(err) {
        eprintln!("{}", line);
    }
}

/// Status line for the optional source deletion.
pub fn format_delete_result(source: &Path, result: &std::io::Result<()>) -> String {
    match result {
        Ok(()) => format!("Deleted source: {}", source.display()),
        Err(e) => format!(
            "Warning: could not delete source {}: {}",
            source.display(),
            e
        ),
    }
}
