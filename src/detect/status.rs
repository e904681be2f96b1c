//! Status records produced by detectors.
//!
//! Constructors are the only way detectors build these records, which keeps
//! the core invariant in one place: an unavailable tool always carries an
//! error and never a path, version, or source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Presence and version of one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolStatus {
    pub available: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub error: Option<String>,
}

impl ToolStatus {
    /// The tool was found and ran. `version` may be `None` if unparsable.
    pub fn found(path: PathBuf, version: Option<String>) -> Self {
        Self {
            available: true,
            path: Some(path),
            version,
            error: None,
        }
    }

    /// The tool is not usable.
    pub fn unavailable(error: impl ToString) -> Self {
        Self {
            available: false,
            path: None,
            version: None,
            error: Some(error.to_string()),
        }
    }

    /// One-line description for display.
    pub fn describe(&self) -> String {
        match (self.available, &self.version, &self.path) {
            (true, Some(version), Some(path)) => format!("{} ({})", version, path.display()),
            (true, None, Some(path)) => format!("unknown version ({})", path.display()),
            (true, _, None) => "available".to_string(),
            (false, ..) => self.error.clone().unwrap_or_default(),
        }
    }
}

/// Which strategy located the Bun binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BunSource {
    System,
    Bundled,
    Vendor,
}

impl fmt::Display for BunSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BunSource::System => "system",
            BunSource::Bundled => "bundled",
            BunSource::Vendor => "vendor",
        };
        f.write_str(name)
    }
}

/// Bun status, with the winning strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BunStatus {
    pub available: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub source: Option<BunSource>,
    pub error: Option<String>,
}

impl BunStatus {
    pub fn found(path: PathBuf, version: String, source: BunSource) -> Self {
        Self {
            available: true,
            path: Some(path),
            version: Some(version),
            source: Some(source),
            error: None,
        }
    }

    pub fn unavailable(error: impl ToString) -> Self {
        Self {
            available: false,
            path: None,
            version: None,
            source: None,
            error: Some(error.to_string()),
        }
    }

    pub fn describe(&self) -> String {
        match (&self.version, &self.path, self.source) {
            (Some(version), Some(path), Some(source)) if self.available => {
                format!("{} ({}, {})", version, source, path.display())
            }
            _ => self.error.clone().unwrap_or_default(),
        }
    }
}

/// WSL status, with the parsed distribution listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WslStatus {
    pub available: bool,
    pub path: Option<PathBuf>,
    /// WSL version (`"1"` or `"2"`) of the default distribution.
    pub version: Option<String>,
    pub default_distro: Option<String>,
    pub distros: Vec<String>,
    pub error: Option<String>,
}

impl WslStatus {
    pub fn found(
        path: PathBuf,
        distros: Vec<String>,
        default_distro: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            available: true,
            path: Some(path),
            version,
            default_distro,
            distros,
            error: None,
        }
    }

    pub fn unavailable(error: impl ToString) -> Self {
        Self {
            available: false,
            path: None,
            version: None,
            default_distro: None,
            distros: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn describe(&self) -> String {
        if !self.available {
            return self.error.clone().unwrap_or_default();
        }
        let default = self.default_distro.as_deref().unwrap_or("no default");
        match &self.version {
            Some(version) => format!("WSL {} ({}; {} distro(s))", version, default, self.distros.len()),
            None => format!("WSL ({}; {} distro(s))", default, self.distros.len()),
        }
    }
}

/// A POSIX shell environment available on Windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShellEnvironment {
    #[serde(rename = "git-bash")]
    GitBash,
    #[serde(rename = "wsl")]
    Wsl,
}

impl fmt::Display for ShellEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellEnvironment::GitBash => f.write_str("git-bash"),
            ShellEnvironment::Wsl => f.write_str("wsl"),
        }
    }
}

impl FromStr for ShellEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git-bash" => Ok(ShellEnvironment::GitBash),
            "wsl" => Ok(ShellEnvironment::Wsl),
            other => Err(format!("unknown shell environment '{}'", other)),
        }
    }
}

/// Git Bash and WSL results plus the derived recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellEnvironmentStatus {
    pub git_bash: ToolStatus,
    pub wsl: WslStatus,
    pub recommended: Option<ShellEnvironment>,
}
