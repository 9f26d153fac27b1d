//! Extension metadata parsing.
//!
//! Extensions are described on disk in two different JSON layouts:
//!
//! | Layout | File | Id |
//! |--------|------|----|
//! | [`Manifest`] | `{extensionDir}/package.json` | `publisher + "." + name` |
//! | [`RegistryEntry`] | one element of `{profileDir}/extensions.json` | `identifier.id` verbatim |
//!
//! Both converge on [`ExtensionRecord`]. Parsing never touches the
//! filesystem; values such as the install date of a manifest's directory
//! are handed in by the caller.
//!
//! # Example
//!
//! ```
//! use vsc_inventory::parser::parse_registry;
//!
//! let json = r#"[
//!     {"identifier": {"id": "pub.ext"}, "metadata": {"displayName": "Ext"}},
//!     {"metadata": {"displayName": "No id"}}
//! ]"#;
//!
//! let entries = parse_registry(json).unwrap();
//! assert_eq!(entries.len(), 2);
//! assert!(entries[0].is_ok());
//! assert!(entries[1].is_err());
//! ```

mod manifest;
mod registry;

pub use manifest::{Manifest, Messages};
pub use registry::{parse_registry, parse_registry_entry, RegistryEntry};

use crate::error::{ParseError, ValidationError};
use crate::model::ExtensionRecord;
use chrono::{DateTime, Local};
use serde_json::Value;

/// A raw extension document, classified by its top-level keys.
#[derive(Debug)]
pub enum ExtensionSource {
    Manifest(Manifest),
    RegistryEntry(RegistryEntry),
}

impl ExtensionSource {
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Classifies a JSON object: anything carrying an `identifier` key is a
    /// registry entry, everything else is treated as a manifest.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let is_registry_entry = match &value {
            Value::Object(map) => map.contains_key("identifier"),
            _ => return Err(ValidationError::WrongType("object").into()),
        };

        if is_registry_entry {
            Ok(Self::RegistryEntry(RegistryEntry::from_value(value)?))
        } else {
            Ok(Self::Manifest(Manifest::from_value(value)?))
        }
    }

    /// True for a manifest with `%key%` placeholders to resolve.
    pub fn needs_localization(&self) -> bool {
        match self {
            Self::Manifest(manifest) => manifest.needs_localization(),
            Self::RegistryEntry(_) => false,
        }
    }

    /// Resolves manifest placeholders; registry entries are already final.
    pub fn localized(self, messages: &Messages) -> Self {
        match self {
            Self::Manifest(manifest) => Self::Manifest(manifest.localized(messages)),
            entry => entry,
        }
    }

    /// `install_date` is the creation time of a manifest's directory.
    /// Registry entries carry their own timestamp and ignore it.
    pub fn into_record(
        self,
        install_date: Option<DateTime<Local>>,
    ) -> Result<ExtensionRecord, ValidationError> {
        match self {
            Self::Manifest(manifest) => manifest.into_record(install_date),
            Self::RegistryEntry(entry) => entry.into_record(),
        }
    }
}

/// Parses a single document of either layout.
pub fn parse_extension(
    json: &str,
    install_date: Option<DateTime<Local>>,
) -> Result<ExtensionRecord, ParseError> {
    Ok(ExtensionSource::from_json(json)?.into_record(install_date)?)
}

/// Keeps a string only if it has visible content.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn schema_error(err: serde_json::Error) -> ParseError {
    ValidationError::Schema(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extension_dispatches_manifest() {
        let record = parse_extension(r#"{"name": "python", "publisher": "ms-python"}"#, None)
            .unwrap();

        assert_eq!(record.id, "ms-python.python");
    }

    #[test]
    fn test_parse_extension_dispatches_registry_entry() {
        let record = parse_extension(
            r#"{"identifier": {"id": "ms-python.python"}, "metadata": {"publisherDisplayName": "Microsoft"}}"#,
            None,
        )
        .unwrap();

        assert_eq!(record.id, "ms-python.python");
        assert_eq!(record.publisher, "Microsoft");
    }

    #[test]
    fn test_parse_extension_structural_error() {
        let err = parse_extension("{not json", None).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_parse_extension_rejects_non_object() {
        let err = parse_extension("[1, 2]", None).unwrap_err();

        assert!(!err.is_structural());
        assert!(matches!(
            err,
            ParseError::Validation(ValidationError::WrongType("object"))
        ));
    }

    #[test]
    fn test_registry_entry_ignores_caller_install_date() {
        let record =
            parse_extension(r#"{"identifier": {"id": "pub.ext"}}"#, Some(Local::now())).unwrap();

        assert!(record.install_date.is_none());
    }

    #[test]
    fn test_localized_only_touches_manifests() {
        let messages = Messages::from_json(r#"{"name": "Python"}"#).unwrap();

        let source = ExtensionSource::from_json(
            r#"{"name": "python", "publisher": "ms-python", "displayName": "%name%"}"#,
        )
        .unwrap();
        assert!(source.needs_localization());
        let record = source.localized(&messages).into_record(None).unwrap();
        assert_eq!(record.display_name, "Python");

        let source =
            ExtensionSource::from_json(r#"{"identifier": {"id": "a.b"}, "metadata": {"displayName": "%name%"}}"#)
                .unwrap();
        assert!(!source.needs_localization());
        let record = source.localized(&messages).into_record(None).unwrap();
        assert_eq!(record.display_name, "%name%");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("a".to_string())), Some("a".to_string()));
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(None), None);
    }
}
