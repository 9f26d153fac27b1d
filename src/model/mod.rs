//! Core data types for discovered profiles and extensions.
//!
//! This module contains the value types passed between the scanners and
//! the exporters:
//!
//! - [`ExtensionRecord`] - One installed (or registered) extension
//! - [`ProfileRecord`] - One user profile and the extensions it owns
//! - [`Platform`] - Operating system family used for path resolution
//! - [`Edition`] - VSCode release channel (stable or insiders)
//!
//! Records are never mutated after construction. Deriving a changed record
//! always goes through a method that returns a new value.
//!
//! # Example
//!
//! ```
//! use vsc_inventory::{ExtensionRecord, ProfileRecord};
//!
//! let ext = ExtensionRecord::new("ms-python.python", "Python", "2024.2.1", "ms-python");
//! let profile = ProfileRecord::custom("Work", "/tmp/work", vec![ext], None);
//!
//! let flattened = profile.flattened();
//! assert_eq!(flattened[0].profile_name.as_deref(), Some("Work"));
//! assert!(profile.extensions[0].profile_name.is_none());
//! ```

mod extension;
mod host;
mod profile;

pub use extension::*;
pub use host::*;
pub use profile::*;
