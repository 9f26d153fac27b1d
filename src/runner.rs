//! Discovery-then-export entry point driven by the command-line layer.

use crate::config::{Config, IgnoreConfig};
use crate::error::ExportError;
use crate::model::ProfileRecord;
use crate::output::{export_all, export_per_profile, export_summary, ExportMode};
use crate::platform::VscodePaths;
use crate::scanner::discover_profiles;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a run needs, already resolved from flags and config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: ExportMode,
    pub paths: VscodePaths,
    pub output_dir: PathBuf,
    pub all_file_name: String,
    pub summary_file_name: String,
    pub ignore: IgnoreConfig,
}

impl RunOptions {
    /// Options from config alone, with paths for the given home directory.
    pub fn from_config(config: &Config, paths: VscodePaths) -> Self {
        let paths = match &config.base_dir {
            Some(base) => paths.with_base_dir(base),
            None => paths,
        };
        let paths = match &config.extensions_dir {
            Some(dir) => paths.with_extensions_dir(dir),
            None => paths,
        };

        Self {
            mode: config.default_mode,
            paths,
            output_dir: config.output_dir.clone(),
            all_file_name: config.all_file_name.clone(),
            summary_file_name: config.summary_file_name.clone(),
            ignore: config.ignore.clone(),
        }
    }

    pub fn all_path(&self) -> PathBuf {
        self.output_dir.join(&self.all_file_name)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file_name)
    }
}

/// What a run found and wrote.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub profiles: usize,
    pub extensions: usize,
    pub files: Vec<PathBuf>,
}

/// Discovers profiles, applies the ignore list, and writes the requested
/// report(s).
///
/// # Errors
///
/// Only write failures are returned; discovery problems are logged and
/// reduce what gets exported.
pub async fn run(options: &RunOptions) -> Result<RunReport, ExportError> {
    let profiles = discover(options).await;
    export(&profiles, options)
}

/// Discovery plus the ignore list, without writing anything.
pub async fn discover(options: &RunOptions) -> Vec<ProfileRecord> {
    let profiles = discover_profiles(&options.paths).await;
    let total = profiles.len();
    let profiles = options.ignore.retain_profiles(profiles);

    if profiles.len() < total {
        info!("Ignoring {} profile(s) per configuration", total - profiles.len());
    }
    profiles
}

/// Writes the report(s) selected by `options.mode`.
pub fn export(profiles: &[ProfileRecord], options: &RunOptions) -> Result<RunReport, ExportError> {
    let mut files = Vec::new();

    if matches!(options.mode, ExportMode::All | ExportMode::Everything) {
        files.push(write_all(profiles, &options.all_path())?);
    }
    if matches!(options.mode, ExportMode::PerProfile | ExportMode::Everything) {
        files.extend(export_per_profile(profiles, &options.output_dir)?);
    }
    if matches!(options.mode, ExportMode::Summary | ExportMode::Everything) {
        let path = options.summary_path();
        export_summary(profiles, &path)?;
        files.push(path);
    }

    Ok(RunReport {
        profiles: profiles.len(),
        extensions: profiles.iter().map(|p| p.extensions.len()).sum(),
        files,
    })
}

fn write_all(profiles: &[ProfileRecord], path: &Path) -> Result<PathBuf, ExportError> {
    export_all(profiles, path)?;
    Ok(path.to_path_buf())
}
