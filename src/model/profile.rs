use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::ExtensionRecord;

/// Name given to the profile backed by the flat extensions directory.
pub const DEFAULT_PROFILE_NAME: &str = "Default";

/// A discovered user profile.
///
/// Owns its extensions by value, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub name: String,
    pub path: PathBuf,
    pub extensions: Vec<ExtensionRecord>,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Local>>,
}

impl ProfileRecord {
    /// Builds the `"Default"` profile.
    pub fn default_profile(
        path: impl Into<PathBuf>,
        extensions: Vec<ExtensionRecord>,
        last_modified: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            name: DEFAULT_PROFILE_NAME.to_string(),
            path: path.into(),
            extensions,
            is_default: true,
            last_modified,
        }
    }

    /// Builds a named, non-default profile.
    pub fn custom(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        extensions: Vec<ExtensionRecord>,
        last_modified: Option<DateTime<Local>>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            extensions,
            is_default: false,
            last_modified,
        }
    }

    pub fn built_in_count(&self) -> usize {
        self.extensions.iter().filter(|e| e.is_built_in).count()
    }

    pub fn third_party_count(&self) -> usize {
        self.extensions.iter().filter(|e| !e.is_built_in).count()
    }

    /// Copies of this profile's extensions stamped with the profile name.
    pub fn flattened(&self) -> Vec<ExtensionRecord> {
        self.extensions
            .iter()
            .map(|e| e.for_profile(&self.name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(id: &str, built_in: bool) -> ExtensionRecord {
        ExtensionRecord::new(id, id, "1.0.0", "pub").with_built_in(built_in)
    }

    #[test]
    fn test_default_profile() {
        let profile = ProfileRecord::default_profile("/base", Vec::new(), None);

        assert_eq!(profile.name, "Default");
        assert!(profile.is_default);
        assert!(profile.extensions.is_empty());
    }

    #[test]
    fn test_counts() {
        let profile = ProfileRecord::custom(
            "Work",
            "/base/profiles/abc",
            vec![ext("pub.a", true), ext("pub.b", false), ext("pub.c", false)],
            None,
        );

        assert_eq!(profile.built_in_count(), 1);
        assert_eq!(profile.third_party_count(), 2);
        assert!(!profile.is_default);
    }

    #[test]
    fn test_flattened_keeps_originals_unstamped() {
        let profile = ProfileRecord::custom("Work", "/p", vec![ext("pub.a", false)], None);
        let flat = profile.flattened();

        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].profile_name.as_deref(), Some("Work"));
        assert!(profile.extensions[0].profile_name.is_none());
    }
}
