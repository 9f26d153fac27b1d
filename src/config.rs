//! Configuration file handling.
//!
//! This module provides loading and saving of vsc-inventory configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/vsc-inventory/config.toml`
//! - macOS: `~/Library/Application Support/vsc-inventory/config.toml`
//! - Windows: `%APPDATA%\vsc-inventory\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! output_dir = "reports"
//! default_mode = "everything"
//! all_file_name = "vscode-extensions.csv"
//! summary_file_name = "vscode-profiles-summary.csv"
//! edition = "stable"
//!
//! [ignore]
//! profiles = ["Temp*", "Scratch"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::{Edition, ProfileRecord};
use crate::output::ExportMode;

/// Application configuration.
///
/// Every field has a default, so a partial file (or no file) is fine.
///
/// # Example
///
/// ```no_run
/// use vsc_inventory::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Output directory: {}", config.output_dir.display());
/// println!("Default mode: {}", config.default_mode);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory reports are written to when `--output-dir` is not given.
    ///
    /// Default: the current directory
    pub output_dir: PathBuf,

    /// Report(s) produced when `--mode` is not given.
    ///
    /// Default: "all"
    pub default_mode: ExportMode,

    /// File name of the combined extensions report.
    ///
    /// Default: "vscode-extensions.csv"
    pub all_file_name: String,

    /// File name of the profile summary report.
    ///
    /// Default: "vscode-profiles-summary.csv"
    pub summary_file_name: String,

    /// Which VSCode installation to inventory.
    ///
    /// Default: stable
    pub edition: Edition,

    /// Overrides the base user directory (portable installs).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Overrides the flat extensions directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions_dir: Option<PathBuf>,

    /// Profiles left out of every report.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Profiles to leave out of exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Profile names to skip. Supports `*` wildcards (e.g. "Temp*").
    pub profiles: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a profile should be ignored.
    pub fn should_ignore_profile(&self, profile_name: &str) -> bool {
        self.profiles.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, profile_name)
            } else {
                pattern == profile_name
            }
        })
    }

    /// Drops ignored profiles, keeping the order of the rest.
    pub fn retain_profiles(&self, profiles: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
        profiles
            .into_iter()
            .filter(|p| !self.should_ignore_profile(&p.name))
            .collect()
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            default_mode: ExportMode::All,
            all_file_name: "vscode-extensions.csv".to_string(),
            summary_file_name: "vscode-profiles-summary.csv".to_string(),
            edition: Edition::Stable,
            base_dir: None,
            extensions_dir: None,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        crate::platform::config_file()
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
