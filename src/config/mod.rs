//! Configuration management for `pagetune.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   ├── fonts      # [fonts]
//! │   ├── hints      # [hints]
//! │   ├── images     # [images]
//! │   ├── site       # [site]
//! │   └── speculation # [speculation]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # PagetuneConfig (this file)
//! ```
//!
//! The configuration is read-only while pages are processed. It is passed
//! by reference into every stage and may be shared between threads.

pub mod section;
pub mod types;
pub mod util;

pub use section::{
    AssetsConfig, Eagerness, FONT_CDN_ORIGIN, FontMode, FontsConfig, HintsConfig, ImagesConfig,
    SiteConfig, SpeculationConfig, SpeculationMode,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing pagetune.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PagetuneConfig {
    /// Site location and sub-directory URLs
    pub site: SiteConfig,

    /// Font stylesheet rewriting
    pub fonts: FontsConfig,

    /// Preconnect and preload hints
    pub hints: HintsConfig,

    /// Image feature flags
    pub images: ImagesConfig,

    /// Speculation rules
    pub speculation: SpeculationConfig,

    /// Asset URL cleanup
    pub assets: AssetsConfig,
}

impl PagetuneConfig {
    /// Load and validate configuration from a file.
    ///
    /// Unknown fields are reported as warnings and otherwise ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::from_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.fonts.validate(&mut diag);
        self.hints.validate(&mut diag);

        diag.print_warnings();

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PagetuneConfig {
    let (parsed, ignored) = PagetuneConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        assert!(PagetuneConfig::from_str("[fonts\nmode = \"remove\"").is_err());
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = PagetuneConfig::from_str("").unwrap();
        assert_eq!(config.fonts.mode, FontMode::Keep);
        assert!(!config.speculation.enable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[fonts]\nmode = \"remove\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PagetuneConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.fonts.mode, FontMode::Remove);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nurl = \"https://example.com/blog/\"\n[fonts]\nmode = 3").unwrap();

        let config = PagetuneConfig::load(file.path()).unwrap();
        assert_eq!(config.fonts.mode, FontMode::AggregateBlocking);
        assert_eq!(config.site.url.as_deref(), Some("https://example.com/blog/"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PagetuneConfig::load(Path::new("/nonexistent/pagetune.toml")).unwrap_err();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_load_reports_all_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[site]\nurl = \"blog\"\n[hints]\nanchor = \"\"").unwrap();

        let err = PagetuneConfig::load(file.path()).unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.len(), 2);
    }
}
