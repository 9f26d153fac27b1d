use super::{created_time, is_dir, modified_time, read_optional, subdirectories, ProfileScanner};
use crate::model::{ExtensionRecord, ProfileRecord};
use crate::parser::{ExtensionSource, Messages};
use crate::platform::VscodePaths;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, warn};

/// Scans the flat extensions directory as the `"Default"` profile.
pub struct DefaultProfileScanner;

#[async_trait]
impl ProfileScanner for DefaultProfileScanner {
    fn name(&self) -> &'static str {
        "Default profile"
    }

    async fn scan(&self, paths: &VscodePaths) -> Result<Vec<ProfileRecord>> {
        if !is_dir(&paths.base_dir).await {
            debug!("VSCode base directory not found: {}", paths.base_dir.display());
            return Ok(Vec::new());
        }

        let extensions = scan_extensions_dir(&paths.extensions_dir).await;
        let last_modified = modified_time(&paths.base_dir).await;

        Ok(vec![ProfileRecord::default_profile(
            &paths.base_dir,
            extensions,
            last_modified,
        )])
    }
}

/// Parses every `*/package.json` below `dir`.
///
/// Extensions that cannot be read or validated are logged and skipped.
pub async fn scan_extensions_dir(dir: &Path) -> Vec<ExtensionRecord> {
    if !is_dir(dir).await {
        debug!("Extensions directory not found: {}", dir.display());
        return Vec::new();
    }

    let mut extensions = Vec::new();

    for extension_dir in subdirectories(dir) {
        match read_extension(&extension_dir).await {
            Ok(Some(record)) => extensions.push(record),
            Ok(None) => {
                debug!("No package.json in {}", extension_dir.display());
            }
            Err(err) => {
                warn!("Skipping extension {}: {:#}", extension_dir.display(), err);
            }
        }
    }

    extensions
}

async fn read_extension(extension_dir: &Path) -> Result<Option<ExtensionRecord>> {
    let manifest_path = extension_dir.join("package.json");

    let content = match read_optional(&manifest_path)
        .await
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?
    {
        Some(content) => content,
        None => return Ok(None),
    };

    let mut source = ExtensionSource::from_json(&content)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    if source.needs_localization() {
        if let Some(messages) = load_messages(extension_dir).await {
            source = source.localized(&messages);
        }
    }

    let record = source
        .into_record(created_time(extension_dir).await)
        .with_context(|| format!("Invalid manifest {}", manifest_path.display()))?;

    Ok(Some(record))
}

/// Loads `package.nls.json`; localization is best-effort.
async fn load_messages(extension_dir: &Path) -> Option<Messages> {
    let path = extension_dir.join("package.nls.json");
    let content = read_optional(&path).await.ok()??;

    match Messages::from_json(&content) {
        Ok(messages) => Some(messages),
        Err(err) => {
            debug!("Ignoring {}: {}", path.display(), err);
            None
        }
    }
}
