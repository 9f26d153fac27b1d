use super::{non_empty, schema_error};
use crate::error::{ParseError, ValidationError};
use crate::model::{ExtensionRecord, UNKNOWN_VERSION};
use chrono::{DateTime, Local};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// An extension's own `package.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    name: Option<String>,
    publisher: Option<String>,
    display_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    repository: Option<RepositoryField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    String(String),
    Object { url: String },
    Other(IgnoredAny),
}

impl RepositoryField {
    fn into_url(self) -> Option<String> {
        match self {
            RepositoryField::String(s) => non_empty(Some(s)),
            RepositoryField::Object { url } => non_empty(Some(url)),
            RepositoryField::Other(_) => None,
        }
    }
}

/// Localized strings from `package.nls.json`.
///
/// Manifests may use `%key%` placeholders for their display name and
/// description; this table resolves them.
#[derive(Debug, Default, Clone)]
pub struct Messages(HashMap<String, String>);

impl Messages {
    /// Parses a `package.nls.json` document. Values are either plain
    /// strings or `{ "message": ..., "comment": ... }` objects.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(ValidationError::WrongType("object").into());
        };

        let messages = map
            .into_iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    Value::Object(obj) => obj.get("message")?.as_str()?.to_string(),
                    _ => return None,
                };
                Some((key, text))
            })
            .collect();

        Ok(Self(messages))
    }

    fn resolve(&self, text: String) -> String {
        match placeholder_key(&text).and_then(|key| self.0.get(key)) {
            Some(message) => message.clone(),
            None => text,
        }
    }
}

fn placeholder_key(text: &str) -> Option<&str> {
    let key = text.strip_prefix('%')?.strip_suffix('%')?;
    (!key.is_empty()).then_some(key)
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        if !value.is_object() {
            return Err(ValidationError::WrongType("object").into());
        }
        serde_json::from_value(value).map_err(schema_error)
    }

    /// True when the display name or description is a `%key%` placeholder.
    pub fn needs_localization(&self) -> bool {
        [&self.display_name, &self.description]
            .into_iter()
            .flatten()
            .any(|s| placeholder_key(s).is_some())
    }

    pub fn localized(mut self, messages: &Messages) -> Self {
        self.display_name = self.display_name.map(|s| messages.resolve(s));
        self.description = self.description.map(|s| messages.resolve(s));
        self
    }

    /// Validates the manifest and builds a record.
    ///
    /// `install_date` is the creation time of the extension's directory.
    pub fn into_record(
        self,
        install_date: Option<DateTime<Local>>,
    ) -> Result<ExtensionRecord, ValidationError> {
        let name = non_empty(self.name).ok_or(ValidationError::MissingField("name"))?;
        let publisher =
            non_empty(self.publisher).ok_or(ValidationError::MissingField("publisher"))?;

        let id = format!("{}.{}", publisher, name);
        let display_name = non_empty(self.display_name).unwrap_or_else(|| id.clone());
        let version = non_empty(self.version).unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let category = self
            .categories
            .filter(|c| !c.is_empty())
            .map(|c| c.join("; "));

        Ok(ExtensionRecord::new(id, display_name, version, publisher)
            .with_description(self.description)
            .with_category(category)
            .with_repository(self.repository.and_then(RepositoryField::into_url))
            .with_install_date(install_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_extension;

    #[test]
    fn test_parse_manifest_full() {
        let json = r#"{
            "name": "gitlens",
            "publisher": "eamodio",
            "displayName": "GitLens",
            "version": "15.0.4",
            "description": "Supercharge Git",
            "categories": ["SCM Providers", "Other"],
            "repository": {"type": "git", "url": "https://github.com/gitkraken/vscode-gitlens.git"}
        }"#;
        let date = Local::now();
        let record = parse_extension(json, Some(date)).unwrap();

        assert_eq!(record.id, "eamodio.gitlens");
        assert_eq!(record.display_name, "GitLens");
        assert_eq!(record.version, "15.0.4");
        assert_eq!(record.publisher, "eamodio");
        assert_eq!(record.description.as_deref(), Some("Supercharge Git"));
        assert_eq!(record.category.as_deref(), Some("SCM Providers; Other"));
        assert_eq!(
            record.repository.as_deref(),
            Some("https://github.com/gitkraken/vscode-gitlens.git")
        );
        assert_eq!(record.install_date, Some(date));
        assert!(record.is_enabled);
        assert!(!record.is_built_in);
    }

    #[test]
    fn test_parse_manifest_defaults() {
        let record = parse_extension(r#"{"name": "ext", "publisher": "pub"}"#, None).unwrap();

        assert_eq!(record.display_name, "pub.ext");
        assert_eq!(record.version, "unknown");
        assert!(record.description.is_none());
        assert!(record.category.is_none());
        assert!(record.repository.is_none());
    }

    #[test]
    fn test_parse_manifest_repository_string() {
        let record = parse_extension(
            r#"{"name": "ext", "publisher": "pub", "repository": "https://example.com/repo"}"#,
            None,
        )
        .unwrap();

        assert_eq!(record.repository.as_deref(), Some("https://example.com/repo"));
    }

    #[test]
    fn test_parse_manifest_repository_without_url_is_ignored() {
        let record = parse_extension(
            r#"{"name": "ext", "publisher": "pub", "repository": {"type": "git"}}"#,
            None,
        )
        .unwrap();

        assert!(record.repository.is_none());
    }

    #[test]
    fn test_parse_manifest_missing_name() {
        let err = parse_extension(r#"{"publisher": "pub"}"#, None).unwrap_err();

        assert!(matches!(
            err,
            ParseError::Validation(ValidationError::MissingField("name"))
        ));
    }

    #[test]
    fn test_parse_manifest_empty_publisher() {
        let err = parse_extension(r#"{"name": "ext", "publisher": ""}"#, None).unwrap_err();

        assert!(matches!(
            err,
            ParseError::Validation(ValidationError::MissingField("publisher"))
        ));
    }

    #[test]
    fn test_parse_manifest_malformed() {
        let err = parse_extension(r#"{"name": "ext", "#, None).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_parse_manifest_wrong_field_type() {
        let err = parse_extension(r#"{"name": 42, "publisher": "pub"}"#, None).unwrap_err();

        assert!(matches!(
            err,
            ParseError::Validation(ValidationError::Schema(_))
        ));
    }

    #[test]
    fn test_localization() {
        let manifest = Manifest::from_json(
            r#"{"name": "ext", "publisher": "pub", "displayName": "%ext.name%", "description": "%ext.desc%"}"#,
        )
        .unwrap();
        assert!(manifest.needs_localization());

        let messages = Messages::from_json(
            r#"{"ext.name": "My Extension", "ext.desc": {"message": "Does things", "comment": ["x"]}}"#,
        )
        .unwrap();
        let record = manifest.localized(&messages).into_record(None).unwrap();

        assert_eq!(record.display_name, "My Extension");
        assert_eq!(record.description.as_deref(), Some("Does things"));
    }

    #[test]
    fn test_localization_unknown_key_keeps_placeholder() {
        let manifest = Manifest::from_json(
            r#"{"name": "ext", "publisher": "pub", "displayName": "%missing%"}"#,
        )
        .unwrap();
        let record = manifest
            .localized(&Messages::default())
            .into_record(None)
            .unwrap();

        assert_eq!(record.display_name, "%missing%");
    }

    #[test]
    fn test_needs_localization_plain_text() {
        let manifest =
            Manifest::from_json(r#"{"name": "ext", "publisher": "pub", "displayName": "100%"}"#)
                .unwrap();
        assert!(!manifest.needs_localization());
    }
}
