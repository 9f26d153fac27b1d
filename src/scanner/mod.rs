//! Profile discovery.
//!
//! This module provides the [`ProfileScanner`] trait and the two scanners
//! that together find every profile of a VSCode installation.
//!
//! | Scanner | Reads | Produces |
//! |---------|-------|----------|
//! | [`DefaultProfileScanner`] | `~/.vscode/extensions/*/package.json` | the `"Default"` profile |
//! | [`CustomProfileScanner`] | `User/profiles/*/extensions.json` | one profile per directory |
//!
//! Discovery prefers partial results over failure: a missing directory is
//! an empty result, and an unreadable extension or profile is logged and
//! skipped. [`discover_profiles`] never fails.
//!
//! # Example
//!
//! ```no_run
//! use vsc_inventory::{platform::VscodePaths, scanner::discover_profiles, Edition};
//!
//! #[tokio::main]
//! async fn main() {
//!     let paths = VscodePaths::detect(Edition::Stable).expect("no home directory");
//!     for profile in discover_profiles(&paths).await {
//!         println!("{}: {} extensions", profile.name, profile.extensions.len());
//!     }
//! }
//! ```

mod custom_profiles;
mod default_profile;
pub mod sync_metadata;

pub use custom_profiles::CustomProfileScanner;
pub use default_profile::{scan_extensions_dir, DefaultProfileScanner};

use crate::model::ProfileRecord;
use crate::platform::VscodePaths;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Trait for discovering one kind of profile.
#[async_trait]
pub trait ProfileScanner: Send + Sync {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Scans for profiles under the given paths.
    ///
    /// A missing directory yields an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the scan cannot proceed at all; callers
    /// log it and carry on with the other scanners.
    async fn scan(&self, paths: &VscodePaths) -> Result<Vec<ProfileRecord>>;
}

/// Returns the scanners in the order their profiles are reported.
pub fn all_scanners() -> Vec<Box<dyn ProfileScanner>> {
    vec![Box::new(DefaultProfileScanner), Box::new(CustomProfileScanner)]
}

/// Finds every profile: the default profile first (if the base directory
/// exists), then custom profiles in directory-listing order.
pub async fn discover_profiles(paths: &VscodePaths) -> Vec<ProfileRecord> {
    let mut profiles = Vec::new();

    for scanner in all_scanners() {
        match scanner.scan(paths).await {
            Ok(found) => {
                debug!("{} found {} profile(s)", scanner.name(), found.len());
                profiles.extend(found);
            }
            Err(err) => {
                warn!("{} failed: {:#}", scanner.name(), err);
            }
        }
    }

    profiles
}

/// Immediate subdirectories of `dir`, in listing order.
///
/// Unreadable entries are logged and left out.
pub(crate) fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => Some(entry.into_path()),
            Ok(_) => None,
            Err(err) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), err);
                None
            }
        })
        .collect()
}

pub(crate) async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

pub(crate) async fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    let metadata = fs::metadata(path).await.ok()?;
    metadata.modified().ok().map(DateTime::<Local>::from)
}

/// Creation time where the filesystem records one.
pub(crate) async fn created_time(path: &Path) -> Option<DateTime<Local>> {
    let metadata = fs::metadata(path).await.ok()?;
    metadata.created().ok().map(DateTime::<Local>::from)
}

/// Reads a file that is allowed to be absent. A leading UTF-8 BOM is dropped.
pub(crate) async fn read_optional(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(strip_bom(content))),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// `serde_json` rejects U+FEFF, which Windows editors like to prepend.
pub(crate) fn strip_bom(content: String) -> String {
    match content.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_string(),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn paths_in(root: &Path) -> VscodePaths {
        VscodePaths::resolve(crate::Platform::Linux, root)
    }

    #[tokio::test]
    async fn test_discover_nothing_installed() {
        let home = TempDir::new().unwrap();
        let profiles = discover_profiles(&paths_in(home.path())).await;

        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn test_discover_default_then_custom() {
        let home = TempDir::new().unwrap();
        let paths = paths_in(home.path());

        write(
            &paths.extensions_dir.join("pub.ext-1.0.0").join("package.json"),
            r#"{"name": "ext", "publisher": "pub", "version": "1.0.0"}"#,
        );
        write(
            &paths.profiles_dir.join("abc123").join("extensions.json"),
            r#"[{"identifier": {"id": "other.tool"}}]"#,
        );

        let profiles = discover_profiles(&paths).await;

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Default");
        assert!(profiles[0].is_default);
        assert_eq!(profiles[0].extensions[0].id, "pub.ext");
        assert_eq!(profiles[1].name, "abc123");
        assert!(!profiles[1].is_default);
        assert_eq!(profiles[1].extensions[0].id, "other.tool");
    }

    #[tokio::test]
    async fn test_discover_custom_without_base_extensions() {
        let home = TempDir::new().unwrap();
        let paths = paths_in(home.path());
        fs::create_dir_all(paths.profiles_dir.join("empty")).unwrap();

        let profiles = discover_profiles(&paths).await;

        // The base directory exists (it holds `profiles`), so Default is
        // reported even with no flat extensions directory.
        assert_eq!(profiles.len(), 2);
        assert!(profiles[0].extensions.is_empty());
        assert_eq!(profiles[1].name, "empty");
        assert!(profiles[1].extensions.is_empty());
    }

    #[test]
    fn test_subdirectories_skips_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("extensions.json"), "[]").unwrap();

        let mut names: Vec<_> = subdirectories(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_subdirectories_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(subdirectories(&dir.path().join("nope")).is_empty());
    }

    #[tokio::test]
    async fn test_read_optional_missing() {
        let dir = TempDir::new().unwrap();
        let content = read_optional(&dir.path().join("missing.json")).await.unwrap();

        assert!(content.is_none());
    }

    #[tokio::test]
    async fn test_read_optional_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bom.json");
        fs::write(&path, "\u{FEFF}{}").unwrap();

        let content = read_optional(&path).await.unwrap();

        assert_eq!(content.as_deref(), Some("{}"));
    }
}
