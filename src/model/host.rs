use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps an OS identifier (as in `std::env::consts::OS`) to a platform.
    ///
    /// Anything that is not Windows or macOS resolves like Linux.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" | "darwin" => Platform::MacOS,
            _ => Platform::Linux,
        }
    }
}

/// VSCode release channel. Each keeps its data in separate directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Stable,
    Insiders,
}

impl Edition {
    /// Folder name under the platform's application-data directory.
    pub fn app_dir_name(&self) -> &'static str {
        match self {
            Edition::Stable => "Code",
            Edition::Insiders => "Code - Insiders",
        }
    }

    /// Dot-folder in the home directory holding the flat extensions dir.
    pub fn dot_dir_name(&self) -> &'static str {
        match self {
            Edition::Stable => ".vscode",
            Edition::Insiders => ".vscode-insiders",
        }
    }
}

impl std::str::FromStr for Edition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stable" | "code" => Ok(Edition::Stable),
            "insiders" | "insider" => Ok(Edition::Insiders),
            _ => Err(format!("Unknown edition: {}. Use 'stable' or 'insiders'", s)),
        }
    }
}
