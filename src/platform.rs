//! Cross-platform path resolution.
//!
//! This module maps a platform and home directory to the places where
//! VSCode keeps user data. Nothing here touches the filesystem; callers
//! decide what to do when a path does not exist.
//!
//! Base user directory per platform:
//! - Linux: `~/.config/Code/User/`
//! - macOS: `~/Library/Application Support/Code/User/`
//! - Windows: `%USERPROFILE%\AppData\Roaming\Code\User\`
//!
//! The flat extensions directory is `~/.vscode/extensions/` on all
//! platforms.

use crate::model::{Edition, Platform};
use std::path::{Path, PathBuf};

/// File inside each profile directory listing that profile's extensions.
pub const REGISTRY_FILE_NAME: &str = "extensions.json";

/// Well-known VSCode locations for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VscodePaths {
    /// Base user-configuration directory.
    pub base_dir: PathBuf,
    /// Flat extensions directory backing the default profile.
    pub extensions_dir: PathBuf,
    /// Directory holding one subdirectory per custom profile.
    pub profiles_dir: PathBuf,
    /// Side file mapping profile ids to user-chosen names.
    pub sync_profiles_file: PathBuf,
}

impl VscodePaths {
    /// Resolves paths for the stable edition.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use vsc_inventory::{platform::VscodePaths, Platform};
    ///
    /// let paths = VscodePaths::resolve(Platform::Linux, Path::new("/home/dev"));
    /// assert_eq!(paths.base_dir, Path::new("/home/dev/.config/Code/User"));
    /// assert_eq!(paths.profiles_dir, Path::new("/home/dev/.config/Code/User/profiles"));
    /// ```
    pub fn resolve(platform: Platform, home: &Path) -> Self {
        Self::resolve_for(Edition::Stable, platform, home)
    }

    pub fn resolve_for(edition: Edition, platform: Platform, home: &Path) -> Self {
        let app_data = match platform {
            Platform::Windows => home.join("AppData").join("Roaming"),
            Platform::MacOS => home.join("Library").join("Application Support"),
            Platform::Linux => home.join(".config"),
        };

        let base_dir = app_data.join(edition.app_dir_name()).join("User");
        let extensions_dir = home.join(edition.dot_dir_name()).join("extensions");

        Self::from_base(base_dir, extensions_dir)
    }

    /// Resolves paths for the current user, or `None` without a home directory.
    pub fn detect(edition: Edition) -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::resolve_for(edition, Platform::current(), &home))
    }

    /// Re-roots the profile and sync paths under a different base directory.
    pub fn with_base_dir(self, base_dir: impl Into<PathBuf>) -> Self {
        Self::from_base(base_dir.into(), self.extensions_dir)
    }

    pub fn with_extensions_dir(mut self, extensions_dir: impl Into<PathBuf>) -> Self {
        self.extensions_dir = extensions_dir.into();
        self
    }

    /// Registry file for a given profile directory.
    pub fn registry_file(profile_dir: &Path) -> PathBuf {
        profile_dir.join(REGISTRY_FILE_NAME)
    }

    fn from_base(base_dir: PathBuf, extensions_dir: PathBuf) -> Self {
        Self {
            profiles_dir: base_dir.join("profiles"),
            sync_profiles_file: base_dir
                .join("sync")
                .join("profiles")
                .join("lastSyncprofiles.json"),
            base_dir,
            extensions_dir,
        }
    }
}

/// Returns the path to the configuration file.
///
/// Platform-specific locations:
/// - Linux: `~/.config/vsc-inventory/config.toml`
/// - macOS: `~/Library/Application Support/vsc-inventory/config.toml`
/// - Windows: `%APPDATA%\vsc-inventory\config.toml`
pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vsc-inventory")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_windows() {
        let home = Path::new("C:/Users/dev");
        let paths = VscodePaths::resolve(Platform::Windows, home);

        assert_eq!(
            paths.base_dir,
            home.join("AppData").join("Roaming").join("Code").join("User")
        );
        assert_eq!(paths.extensions_dir, home.join(".vscode").join("extensions"));
    }

    #[test]
    fn test_resolve_macos() {
        let home = Path::new("/Users/dev");
        let paths = VscodePaths::resolve(Platform::MacOS, home);

        assert_eq!(
            paths.base_dir,
            Path::new("/Users/dev/Library/Application Support/Code/User")
        );
        assert_eq!(
            paths.sync_profiles_file,
            Path::new("/Users/dev/Library/Application Support/Code/User/sync/profiles/lastSyncprofiles.json")
        );
    }

    #[test]
    fn test_resolve_linux() {
        let paths = VscodePaths::resolve(Platform::Linux, Path::new("/home/dev"));

        assert_eq!(paths.base_dir, Path::new("/home/dev/.config/Code/User"));
        assert_eq!(paths.profiles_dir, Path::new("/home/dev/.config/Code/User/profiles"));
        assert_eq!(paths.extensions_dir, Path::new("/home/dev/.vscode/extensions"));
    }

    #[test]
    fn test_resolve_insiders() {
        let paths =
            VscodePaths::resolve_for(Edition::Insiders, Platform::Linux, Path::new("/home/dev"));

        assert_eq!(paths.base_dir, Path::new("/home/dev/.config/Code - Insiders/User"));
        assert_eq!(
            paths.extensions_dir,
            Path::new("/home/dev/.vscode-insiders/extensions")
        );
    }

    #[test]
    fn test_with_base_dir_moves_derived_paths() {
        let paths = VscodePaths::resolve(Platform::Linux, Path::new("/home/dev"))
            .with_base_dir("/portable/data/user-data/User");

        assert_eq!(paths.profiles_dir, Path::new("/portable/data/user-data/User/profiles"));
        assert_eq!(
            paths.sync_profiles_file,
            Path::new("/portable/data/user-data/User/sync/profiles/lastSyncprofiles.json")
        );
        assert_eq!(paths.extensions_dir, Path::new("/home/dev/.vscode/extensions"));
    }

    #[test]
    fn test_registry_file() {
        assert_eq!(
            VscodePaths::registry_file(Path::new("/p/abc")),
            Path::new("/p/abc/extensions.json")
        );
    }
}
