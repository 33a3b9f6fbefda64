//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Stock defaults are
//! overridden by an optional `config.toml` in the notes source directory.
//!
//! ## Config File Location
//!
//! ```text
//! notes-src/
//! ├── config.toml              # Overrides stock defaults
//! ├── inflammaging-101.md
//! └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! site_title = "炎症衰老研究笔记"  # Header and page title suffix
//! brand_mark = "IA"                # Short mark next to the site title
//! lang = "zh-CN"                   # <html lang>
//! stylesheet = "styles.css"        # Stylesheet path relative to the site root
//! notes_dir = "notes"              # Detail pages live under <output>/<notes_dir>/
//! excerpt_length = 140             # Derived summary length in characters
//!
//! [processing]
//! max_threads = 4                  # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! site_title = "Inflammaging Notes"
//! lang = "en"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name shown in the header, footer and page titles.
    pub site_title: String,
    /// Short brand mark rendered next to the site title.
    pub brand_mark: String,
    /// Value of the `<html lang>` attribute.
    pub lang: String,
    /// Stylesheet path, relative to the site root.
    pub stylesheet: String,
    /// Directory under the output root holding one subdirectory per note.
    pub notes_dir: String,
    /// Maximum length, in characters, of summaries derived from the body.
    pub excerpt_length: usize,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_title: "炎症衰老研究笔记".to_string(),
            brand_mark: "IA".to_string(),
            lang: "zh-CN".to_string(),
            stylesheet: "styles.css".to_string(),
            notes_dir: "notes".to_string(),
            excerpt_length: 140,
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site_title must not be empty".into(),
            ));
        }
        if self.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "excerpt_length must be greater than 0".into(),
            ));
        }
        let dir = self.notes_dir.as_str();
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "notes_dir must be a single directory name, got `{dir}`"
            )));
        }
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers for parsing and rendering.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse config text, filling unset keys from [`SiteConfig::default`].
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// A missing file yields the defaults. Unknown keys are rejected and the
/// result is validated.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Notes Site Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file in the notes source directory, next to the .md files.
# Unknown keys will cause an error.

# Site name shown in the header, footer and every page title.
site_title = "炎症衰老研究笔记"

# Short brand mark shown next to the site title.
brand_mark = "IA"

# Language of the generated pages (<html lang="...">).
lang = "zh-CN"

# Stylesheet linked from every page, relative to the site root.
stylesheet = "styles.css"

# Detail pages are written to <output>/<notes_dir>/<slug>/index.html.
# Must be a single directory name.
notes_dir = "notes"

# Length in characters of summaries derived from the first paragraph,
# used when a note has no `summary:` in its front matter.
excerpt_length = 140

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for parsing and rendering.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site_title, "炎症衰老研究笔记");
        assert_eq!(config.brand_mark, "IA");
        assert_eq!(config.lang, "zh-CN");
        assert_eq!(config.stylesheet, "styles.css");
        assert_eq!(config.notes_dir, "notes");
        assert_eq!(config.excerpt_length, 140);
        assert_eq!(config.processing.max_threads, None);
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(r#"lang = "en""#).unwrap();
        assert_eq!(config.lang, "en");
        assert_eq!(config.site_title, "炎症衰老研究笔记");
        assert_eq!(config.excerpt_length, 140);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
site_title = "Inflammaging Notes"
excerpt_length = 80

[processing]
max_threads = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site_title, "Inflammaging Notes");
        assert_eq!(config.excerpt_length, 80);
        assert_eq!(config.processing.max_threads, Some(2));
        // Unspecified values should be defaults
        assert_eq!(config.notes_dir, "notes");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "excerpt_length = 0\n").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let config = ProcessingConfig { max_threads: None };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_threads: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_threads: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(r#"site_titel = "x""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let toml_str = r#"
[processing]
max_processes = 4
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "colour = \"red\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_nested_notes_dir() {
        for dir in ["", ".", "..", "a/b", "a\\b"] {
            let config = SiteConfig {
                notes_dir: dir.to_string(),
                ..SiteConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("notes_dir"), "{dir}");
        }
    }

    #[test]
    fn validate_rejects_blank_title() {
        let config = SiteConfig {
            site_title: "  ".to_string(),
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_threads() {
        let config = SiteConfig {
            processing: ProcessingConfig {
                max_threads: Some(0),
            },
            ..SiteConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // parse_config / stock config tests
    // =========================================================================

    #[test]
    fn parse_config_fills_defaults_and_validates() {
        let config = parse_config(r#"brand_mark = "IN""#).unwrap();
        assert_eq!(config.brand_mark, "IN");
        assert_eq!(config.lang, "zh-CN");

        let nested = parse_config("[processing]\nmax_threads = 3\n").unwrap();
        assert_eq!(nested.processing.max_threads, Some(3));
        assert_eq!(nested.site_title, "炎症衰老研究笔记");

        assert!(matches!(
            parse_config("notes_dir = \"a/b\"\n"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SiteConfig::default());
    }
}
