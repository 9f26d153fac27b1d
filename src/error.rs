//! Error types for parsing and exporting.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one JSON document (or registry entry) into a record.
///
/// Callers skip the offending item and continue; the two variants only
/// differ for diagnostics.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The bytes are not valid JSON.
    #[error("malformed JSON: {0}")]
    Structural(#[from] serde_json::Error),

    /// Valid JSON that does not carry what a record needs.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ParseError {
    pub fn is_structural(&self) -> bool {
        matches!(self, ParseError::Structural(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent, null, or empty
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The document root has the wrong JSON type
    #[error("expected a JSON {0}")]
    WrongType(&'static str),

    /// A field has a type the document shape does not allow
    #[error("unexpected document shape: {0}")]
    Schema(String),
}

/// Write-side failure while producing an export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
