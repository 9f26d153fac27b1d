use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Version string used when the source document carries none.
pub const UNKNOWN_VERSION: &str = "unknown";

/// A single extension found in a profile.
///
/// `profile_name` is left empty by the parser and only filled in when the
/// exporter flattens a profile, via [`ExtensionRecord::for_profile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionRecord {
    /// `publisher.name`, never empty.
    pub id: String,
    pub display_name: String,
    pub version: String,
    pub publisher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    pub is_built_in: bool,
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_date: Option<DateTime<Local>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
}

impl ExtensionRecord {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        version: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            version: version.into(),
            publisher: publisher.into(),
            description: None,
            category: None,
            repository: None,
            is_built_in: false,
            is_enabled: true,
            install_date: None,
            install_count: None,
            rating: None,
            profile_name: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_repository(mut self, repository: Option<String>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_built_in(mut self, is_built_in: bool) -> Self {
        self.is_built_in = is_built_in;
        self
    }

    pub fn with_install_date(mut self, install_date: Option<DateTime<Local>>) -> Self {
        self.install_date = install_date;
        self
    }

    pub fn with_install_count(mut self, install_count: Option<u64>) -> Self {
        self.install_count = install_count;
        self
    }

    pub fn with_rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    /// Returns a copy of this record stamped with the owning profile's name.
    ///
    /// The receiver is left untouched, so the same extension can appear
    /// unstamped in its profile and stamped in an export.
    pub fn for_profile(&self, profile_name: &str) -> Self {
        Self {
            profile_name: Some(profile_name.to_string()),
            ..self.clone()
        }
    }
}
