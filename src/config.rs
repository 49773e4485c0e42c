//! Configuration types for the console toolkit

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Lower bound for the animation tick interval
pub const MIN_TICK_MS: u64 = 16;
/// Upper bound for the animation tick interval
pub const MAX_TICK_MS: u64 = 1000;
/// Default animation tick interval
pub const DEFAULT_TICK_MS: u64 = 100;

/// Glyph set used by spinners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpinnerStyle {
    /// Braille dots: ⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏
    #[default]
    Dots,
    /// ASCII line: - \ | /
    Line,
    /// Quarter arcs: ◜◠◝◞◡◟
    Arc,
}

impl SpinnerStyle {
    /// Glyph frames for this style, in animation order
    pub fn glyphs(&self) -> &'static [char] {
        match self {
            SpinnerStyle::Dots => &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'],
            SpinnerStyle::Line => &['-', '\\', '|', '/'],
            SpinnerStyle::Arc => &['◜', '◠', '◝', '◞', '◡', '◟'],
        }
    }
}

/// Configuration for a console session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation tick interval in milliseconds
    pub tick_interval_ms: u64,

    /// Run every step even after a failure
    pub continue_on_error: bool,

    /// Spinner glyph set
    pub spinner: SpinnerStyle,

    /// Show elapsed seconds next to running steps
    pub show_elapsed: bool,

    /// Directory for session log files (defaults to `Log/` beside the executable)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_MS,
            continue_on_error: false,
            spinner: SpinnerStyle::default(),
            show_elapsed: true,
            log_dir: None,
        }
    }
}

impl Config {
    /// Tick interval, clamped to the supported range
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(MIN_TICK_MS, MAX_TICK_MS))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError { source: e })?;

        fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_config() -> String {
        r#"# CybrConsole Configuration File
# This file uses TOML format (https://toml.io)

# Animation tick interval in milliseconds (16..=1000)
tick_interval_ms = 100

# Keep running the remaining steps after a step fails
# - false: abort the run at the first failing step (default)
# - true: run every step and report all failures at the end
continue_on_error = false

# Spinner glyphs: "dots", "line" or "arc"
spinner = "dots"

# Show elapsed seconds next to running steps
show_elapsed = true

# Directory for session log files
# log_dir = "/tmp/cybr-console"
"#
        .to_string()
    }
}

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to write configuration file
    #[error("Failed to write config file '{}': {source}", path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to serialize configuration
    #[error("Failed to serialize config: {source}")]
    SerializeError { source: toml::ser::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert!(!config.continue_on_error);
        assert_eq!(config.spinner, SpinnerStyle::Dots);
    }

    #[test]
    fn test_tick_interval_is_clamped() {
        let fast = Config {
            tick_interval_ms: 1,
            ..Default::default()
        };
        let slow = Config {
            tick_interval_ms: 60_000,
            ..Default::default()
        };
        assert_eq!(fast.tick_interval(), Duration::from_millis(MIN_TICK_MS));
        assert_eq!(slow.tick_interval(), Duration::from_millis(MAX_TICK_MS));
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(&Config::sample_config()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("continue_on_error = true\nspinner = \"arc\"").unwrap();
        assert!(config.continue_on_error);
        assert_eq!(config.spinner, SpinnerStyle::Arc);
        assert_eq!(config.tick_interval_ms, DEFAULT_TICK_MS);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("console.toml");

        let config = Config {
            tick_interval_ms: 80,
            continue_on_error: true,
            spinner: SpinnerStyle::Line,
            show_elapsed: false,
            log_dir: Some(PathBuf::from("/var/log/console")),
        };
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Config::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn test_parse_error_keeps_toml_cause() {
        use std::error::Error as _;

        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "tick_interval_ms = \"fast\"").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("broken.toml"));
        let cause = err.source().unwrap();
        assert!(cause.downcast_ref::<toml::de::Error>().is_some());
    }

    #[test]
    fn test_spinner_glyph_sets_are_distinct() {
        assert_eq!(SpinnerStyle::Dots.glyphs().len(), 10);
        assert_eq!(SpinnerStyle::Line.glyphs().len(), 4);
        assert_eq!(SpinnerStyle::Arc.glyphs().len(), 6);
    }
}
