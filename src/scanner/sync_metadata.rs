//! Profile display names from Settings Sync metadata.
//!
//! `lastSyncprofiles.json` wraps a JSON document inside a JSON string:
//!
//! ```json
//! { "syncData": { "content": "[{\"id\":\"abc\",\"name\":\"Work\"}]" } }
//! ```
//!
//! The mapping only enriches profile names, so every failure along the way
//! yields an empty map.

use super::strip_bom;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Profile id (directory name) to user-chosen name.
pub type ProfileNames = HashMap<String, String>;

/// Loads the id-to-name mapping, or an empty map if anything is off.
pub async fn load_profile_names(path: &Path) -> ProfileNames {
    let content = match fs::read_to_string(path).await {
        Ok(content) => strip_bom(content),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No sync metadata at {}", path.display());
            return ProfileNames::new();
        }
        Err(err) => {
            warn!("Failed to read sync metadata {}: {}", path.display(), err);
            return ProfileNames::new();
        }
    };

    match parse_profile_names(&content) {
        Some(names) => names,
        None => {
            warn!("Ignoring unrecognised sync metadata {}", path.display());
            ProfileNames::new()
        }
    }
}

/// Decodes the nested document; `None` at the first step that fails.
pub fn parse_profile_names(json: &str) -> Option<ProfileNames> {
    let outer: Value = serde_json::from_str(json).ok()?;
    let content = outer.get("syncData")?.get("content")?.as_str()?;
    let inner: Value = serde_json::from_str(content).ok()?;

    inner
        .as_array()?
        .iter()
        .map(|profile| {
            let id = profile.get("id")?.as_str()?;
            let name = profile.get("name")?.as_str()?;
            Some((id.to_string(), name.to_string()))
        })
        .collect()
}
