use super::sync_metadata::{load_profile_names, ProfileNames};
use super::{is_dir, read_optional, subdirectories, ProfileScanner};
use crate::model::{ExtensionRecord, ProfileRecord};
use crate::parser::parse_registry;
use crate::platform::VscodePaths;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Scans `User/profiles/*` for named profiles.
///
/// Each profile only lists what its own `extensions.json` registers. A
/// profile without that file has no extensions; the flat extensions
/// directory belongs to the default profile alone.
pub struct CustomProfileScanner;

#[async_trait]
impl ProfileScanner for CustomProfileScanner {
    fn name(&self) -> &'static str {
        "Custom profiles"
    }

    async fn scan(&self, paths: &VscodePaths) -> Result<Vec<ProfileRecord>> {
        if !is_dir(&paths.profiles_dir).await {
            debug!("Profiles directory not found: {}", paths.profiles_dir.display());
            return Ok(Vec::new());
        }

        let names = load_profile_names(&paths.sync_profiles_file).await;
        let mut profiles = Vec::new();

        for profile_dir in subdirectories(&paths.profiles_dir) {
            match scan_profile(&profile_dir, &names).await {
                Ok(profile) => profiles.push(profile),
                Err(err) => {
                    warn!("Skipping profile {}: {:#}", profile_dir.display(), err);
                }
            }
        }

        Ok(profiles)
    }
}

async fn scan_profile(profile_dir: &Path, names: &ProfileNames) -> Result<ProfileRecord> {
    let id = profile_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("Profile directory has no name")?;

    let metadata = fs::metadata(profile_dir)
        .await
        .with_context(|| format!("Failed to stat {}", profile_dir.display()))?;
    let last_modified = metadata.modified().ok().map(DateTime::<Local>::from);

    let name = names.get(&id).cloned().unwrap_or(id);
    let extensions = read_registry(&VscodePaths::registry_file(profile_dir)).await;

    Ok(ProfileRecord::custom(
        name,
        profile_dir,
        extensions,
        last_modified,
    ))
}

/// Every entry of a registry file that parses, in file order.
async fn read_registry(path: &Path) -> Vec<ExtensionRecord> {
    let content = match read_optional(path).await {
        Ok(Some(content)) => content,
        Ok(None) => {
            debug!("No extension registry at {}", path.display());
            return Vec::new();
        }
        Err(err) => {
            warn!("Failed to read {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    let entries = match parse_registry(&content) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("Failed to parse {}: {}", path.display(), err);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("Skipping entry {} in {}: {}", index, path.display(), err);
                None
            }
        })
        .collect()
}
