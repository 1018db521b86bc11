//! Crop configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [main]
//! width = 4096              # Main crop width in pixels
//! height = 2304             # Main crop height in pixels
//!
//! [logo]
//! enabled = true            # Also produce a square logo crop
//! size = 512                # Logo edge in pixels
//!
//! [encoding]
//! max_bytes = 1000000       # Hard cap on each output file
//! primary_quality = [40, 95]    # Searched first
//! fallback_quality = [10, 39]   # Searched if nothing in primary fits
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [encoding]
//! max_bytes = 500000
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{EncodingConstraint, QualityRange, TargetSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Crop configuration loaded from `config.toml`.
///
/// All fields have defaults matching the 4096x2304 / 512 / 1 MB contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Main rectangular crop.
    pub main: MainConfig,
    /// Square logo crop.
    pub logo: LogoConfig,
    /// Byte budget and quality search ranges.
    pub encoding: EncodingConfig,
}

impl CropConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.main.width == 0 || self.main.height == 0 {
            return Err(ConfigError::Validation(
                "main.width and main.height must be non-zero".into(),
            ));
        }
        if self.logo.size == 0 {
            return Err(ConfigError::Validation("logo.size must be non-zero".into()));
        }
        if self.encoding.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "encoding.max_bytes must be non-zero".into(),
            ));
        }
        if !self.encoding.primary_quality.is_valid() {
            return Err(ConfigError::Validation(
                "encoding.primary_quality must be [floor, ceiling] within 1-100 with floor <= ceiling"
                    .into(),
            ));
        }
        if !self.encoding.fallback_quality.is_valid() {
            return Err(ConfigError::Validation(
                "encoding.fallback_quality must be [floor, ceiling] within 1-100 with floor <= ceiling"
                    .into(),
            ));
        }
        Ok(())
    }

    pub fn main_target(&self) -> TargetSize {
        TargetSize::new(self.main.width, self.main.height)
    }

    pub fn constraint(&self) -> EncodingConstraint {
        EncodingConstraint {
            max_bytes: self.encoding.max_bytes,
            primary: self.encoding.primary_quality,
            fallback: self.encoding.fallback_quality,
        }
    }
}

/// Main crop dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MainConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for MainConfig {
    fn default() -> Self {
        Self {
            width: 4096,
            height: 2304,
        }
    }
}

/// Logo crop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    /// When false only the main crop is produced.
    pub enabled: bool,
    pub size: u32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 512,
        }
    }
}

/// JPEG budget settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    pub max_bytes: u64,
    pub primary_quality: QualityRange,
    pub fallback_quality: QualityRange,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        let c = EncodingConstraint::default();
        Self {
            max_bytes: c.max_bytes,
            primary_quality: c.primary,
            fallback_quality: c.fallback,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(CropConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it is not valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CropConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CropConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, or stock defaults when `path` is `None` or missing.
pub fn load_config(path: Option<&Path>) -> Result<CropConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = match path {
        Some(p) => load_raw_config(p)?,
        None => None,
    };
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Cropper Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with `cropper --config path/to/config.toml <command>`.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Main crop: a random window of exactly width x height pixels.
# Sources smaller than this are upscaled (Lanczos3) just enough to cover it.
# ---------------------------------------------------------------------------
[main]
width = 4096
height = 2304

# ---------------------------------------------------------------------------
# Logo: a centered square cut from the same source.
# ---------------------------------------------------------------------------
[logo]
enabled = true
size = 512

# ---------------------------------------------------------------------------
# Encoding: every output JPEG must fit in max_bytes.
# The highest quality in primary_quality that fits is used; if none fits,
# fallback_quality is searched the same way. If neither range fits the
# run fails and nothing is written.
# ---------------------------------------------------------------------------
[encoding]
max_bytes = 1000000
primary_quality = [40, 95]
fallback_quality = [10, 39]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_contract() {
        let config = CropConfig::default();
        assert_eq!(config.main_target(), TargetSize::new(4096, 2304));
        assert!(config.logo.enabled);
        assert_eq!(config.logo.size, 512);
        assert_eq!(config.constraint(), EncodingConstraint::default());
    }

    #[test]
    fn parse_partial_config() {
        let config: CropConfig = toml::from_str(
            r#"
[encoding]
max_bytes = 500000
"#,
        )
        .unwrap();
        assert_eq!(config.encoding.max_bytes, 500_000);
        // Defaults preserved
        assert_eq!(config.encoding.primary_quality, QualityRange::new(40, 95));
        assert_eq!(config.main.width, 4096);
    }

    #[test]
    fn parse_quality_ranges() {
        let config: CropConfig = toml::from_str(
            r#"
[encoding]
primary_quality = [50, 90]
fallback_quality = [5, 49]
"#,
        )
        .unwrap();
        assert_eq!(config.encoding.primary_quality, QualityRange::new(50, 90));
        assert_eq!(config.encoding.fallback_quality, QualityRange::new(5, 49));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_none_is_default() {
        assert_eq!(load_config(None).unwrap(), CropConfig::default());
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(Some(&tmp.path().join("config.toml"))).unwrap();
        assert_eq!(config, CropConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[main]
width = 1920
height = 1080

[logo]
enabled = false
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.main_target(), TargetSize::new(1920, 1080));
        assert!(!config.logo.enabled);
        assert_eq!(config.logo.size, 512);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[encoding]\nmax_byts = 10\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<CropConfig, _> = toml::from_str("[watermark]\ntext = \"x\"\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(CropConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_main_dimension() {
        let mut config = CropConfig::default();
        config.main.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_logo() {
        let mut config = CropConfig::default();
        config.logo.size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_budget() {
        let mut config = CropConfig::default();
        config.encoding.max_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_inverted_range() {
        let mut config = CropConfig::default();
        config.encoding.primary_quality = QualityRange::new(90, 40);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_quality_above_100() {
        let mut config = CropConfig::default();
        config.encoding.fallback_quality = QualityRange::new(10, 120);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_quality"));
    }

    // =========================================================================
    // merge tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[main]\nwidth = 1\nheight = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[main]\nheight = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["main"]["width"].as_integer(), Some(1));
        assert_eq!(merged["main"]["height"].as_integer(), Some(5));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str("q = [40, 95]").unwrap();
        let overlay: toml::Value = toml::from_str("q = [50, 60]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["q"].as_array().unwrap().len(), 2);
        assert_eq!(merged["q"][0].as_integer(), Some(50));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[logo]\nsize = 0").unwrap();
        assert!(matches!(
            resolve_config(base, Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_defaults_value_is_table() {
        let value = stock_defaults_value().unwrap();
        assert!(value.is_table());
        for section in ["main", "logo", "encoding"] {
            assert!(value.get(section).is_some(), "missing section {section}");
        }
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: CropConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, CropConfig::default());
    }
}
