mod cli;
mod delimited;
mod export;

pub use cli::{print_extensions_table, print_profiles_table};
pub use delimited::{write_field, Column, CsvWriter, Quoting, DELIMITER, LINE_TERMINATOR, QUOTE};
pub use export::*;

use serde::{Deserialize, Serialize};

/// Which report(s) a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportMode {
    /// All profiles' extensions in one file
    All,
    /// One file per profile
    PerProfile,
    /// One row per profile
    Summary,
    /// All three of the above
    Everything,
}

impl ExportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportMode::All => "all",
            ExportMode::PerProfile => "per-profile",
            ExportMode::Summary => "summary",
            ExportMode::Everything => "everything",
        }
    }
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ExportMode::All),
            "per-profile" | "profiles" | "per_profile" => Ok(ExportMode::PerProfile),
            "summary" => Ok(ExportMode::Summary),
            "everything" | "full" => Ok(ExportMode::Everything),
            _ => Err(format!(
                "Unknown export mode: {}. Use 'all', 'per-profile', 'summary', or 'everything'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_mode_from_str() {
        assert_eq!("all".parse::<ExportMode>(), Ok(ExportMode::All));
        assert_eq!("Per-Profile".parse::<ExportMode>(), Ok(ExportMode::PerProfile));
        assert_eq!("summary".parse::<ExportMode>(), Ok(ExportMode::Summary));
        assert_eq!("full".parse::<ExportMode>(), Ok(ExportMode::Everything));
        assert!("sarif".parse::<ExportMode>().is_err());
    }

    #[test]
    fn test_export_mode_display_round_trips() {
        for mode in [
            ExportMode::All,
            ExportMode::PerProfile,
            ExportMode::Summary,
            ExportMode::Everything,
        ] {
            assert_eq!(mode.to_string().parse::<ExportMode>(), Ok(mode));
        }
    }
}
