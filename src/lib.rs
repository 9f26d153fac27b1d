pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod platform;
pub mod runner;
pub mod scanner;

pub use config::Config;
pub use error::{ExportError, ParseError, ValidationError};
pub use model::{Edition, ExtensionRecord, Platform, ProfileRecord};
pub use output::ExportMode;
pub use runner::{run, RunOptions, RunReport};
pub use scanner::discover_profiles;
