use super::{non_empty, schema_error, ExtensionSource};
use crate::error::{ParseError, ValidationError};
use crate::model::{ExtensionRecord, UNKNOWN_VERSION};
use chrono::{DateTime, Local, TimeZone};
use serde::Deserialize;
use serde_json::Value;

/// One element of a profile's `extensions.json`.
#[derive(Debug, Deserialize)]
pub struct RegistryEntry {
    identifier: Option<Identifier>,
    version: Option<String>,
    metadata: Option<RegistryMetadata>,
}

#[derive(Debug, Deserialize)]
struct Identifier {
    id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryMetadata {
    display_name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    publisher_display_name: Option<String>,
    // Loosely typed so an odd value never costs the whole entry.
    is_builtin: Option<Value>,
    installed_timestamp: Option<Value>,
}

impl RegistryEntry {
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        if !value.is_object() {
            return Err(ValidationError::WrongType("object").into());
        }
        serde_json::from_value(value).map_err(schema_error)
    }

    pub fn into_record(self) -> Result<ExtensionRecord, ValidationError> {
        let id = non_empty(self.identifier.and_then(|i| i.id))
            .ok_or(ValidationError::MissingField("identifier.id"))?;
        let metadata = self.metadata.unwrap_or_default();

        let display_name = non_empty(metadata.display_name).unwrap_or_else(|| id.clone());
        let version = non_empty(metadata.version)
            .or_else(|| non_empty(self.version))
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());
        let publisher = metadata.publisher_display_name.unwrap_or_default();
        let description = metadata.description.unwrap_or_default();
        let is_built_in = metadata
            .is_builtin
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let install_date = metadata
            .installed_timestamp
            .as_ref()
            .and_then(Value::as_i64)
            .and_then(from_millis);

        Ok(ExtensionRecord::new(id, display_name, version, publisher)
            .with_description(Some(description))
            .with_built_in(is_built_in)
            .with_install_date(install_date))
    }
}

fn from_millis(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

/// Parses one registry element into a record.
pub fn parse_registry_entry(value: Value) -> Result<ExtensionRecord, ParseError> {
    match ExtensionSource::from_value(value)? {
        ExtensionSource::RegistryEntry(entry) => Ok(entry.into_record()?),
        ExtensionSource::Manifest(_) => Err(ValidationError::MissingField("identifier.id").into()),
    }
}

/// Parses a whole `extensions.json` document.
///
/// The outer error covers a document that is not a JSON array at all.
/// Each element is parsed on its own, so one bad entry shows up as a single
/// `Err` in the returned list while its neighbours still parse.
pub fn parse_registry(json: &str) -> Result<Vec<Result<ExtensionRecord, ParseError>>, ParseError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(entries) = value else {
        return Err(ValidationError::WrongType("array").into());
    };

    Ok(entries.into_iter().map(parse_registry_entry).collect())
}
