//! Tool detectors.
//!
//! Each detector answers one question ("is this tool usable, where, which
//! version?") and always answers with a status record. Failures are folded
//! into the record's `error` field as the rendered [`DetectionFailure`].
//!
//! # Modules
//!
//! - [`node`] - Node.js on PATH or at well-known install locations
//! - [`git`] - Git on PATH or at well-known install locations
//! - [`bun`] - Bun via system, bundled, and vendor strategies
//! - [`git_bash`] - Git for Windows' bash interpreter
//! - [`wsl`] - Windows Subsystem for Linux and its distributions
//! - [`shell_env`] - Recommendation between Git Bash and WSL
//! - [`status`] - Status record types

pub mod bun;
pub mod git;
pub mod git_bash;
pub mod node;
pub mod shell_env;
pub mod status;
pub mod wsl;

pub use status::{
    BunSource, BunStatus, ShellEnvironment, ShellEnvironmentStatus, ToolStatus, WslStatus,
};

use crate::config::RuntimeConfig;
use crate::platform::{Arch, BundleTarget, Platform};
use crate::probe::command::{CommandRunner, ProbeRequest};
use crate::probe::locate;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.]+)?").expect("version regex is valid")
});

/// Why a detector could not report a tool as usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectionFailure {
    /// The binary is absent at every searched location.
    #[error("{tool} not found on PATH or in {searched} searched location(s)")]
    NotFound { tool: String, searched: usize },

    /// The binary was found but could not be run, failed, or timed out.
    #[error("{tool} at {} is not usable: {reason}", path.display())]
    Unusable {
        tool: String,
        path: PathBuf,
        reason: String,
    },

    /// The binary ran but printed no recognizable version. Non-fatal.
    #[error("{tool} reported no recognizable version: {output:?}")]
    VersionUnparsable { tool: String, output: String },

    /// The detector does not apply to this OS.
    #[error("non-Windows platform")]
    PlatformMismatch,

    /// The step was disabled by an init option.
    #[error("{tool} detection skipped ({flag}=true)")]
    Skipped { tool: String, flag: String },
}

impl DetectionFailure {
    pub fn skipped(tool: &str, flag: &str) -> Self {
        DetectionFailure::Skipped {
            tool: tool.to_string(),
            flag: flag.to_string(),
        }
    }
}

/// Extract the first semver-like token from tool output.
///
/// `v20.11.1` yields `20.11.1`, `git version 2.43.0.windows.1` yields
/// `2.43.0`, and `GNU bash, version 5.2.26(1)-release` yields `5.2.26`.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_REGEX
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Everything a detector needs from the outside world.
///
/// Built once per initialization from the process environment (after the
/// shell environment import), or assembled by hand in tests.
pub struct DetectContext<'a> {
    runner: &'a dyn CommandRunner,
    /// Operating system the detectors should behave as.
    pub platform: Platform,
    /// CPU architecture, if supported.
    pub arch: Option<Arch>,
    /// PATH entries, in lookup order.
    pub path_entries: Vec<PathBuf>,
    /// User home directory.
    pub home: Option<PathBuf>,
    /// Fixed system bin directories checked after PATH (Unix-like only).
    pub system_dirs: Vec<PathBuf>,
    vars: HashMap<String, String>,
    /// Timeouts and bundle/vendor locations.
    pub config: RuntimeConfig,
}

impl<'a> DetectContext<'a> {
    /// A context with no PATH, home, system directories, or environment variables.
    pub fn new(runner: &'a dyn CommandRunner, platform: Platform, config: RuntimeConfig) -> Self {
        Self {
            runner,
            platform,
            arch: Arch::current(),
            path_entries: Vec::new(),
            home: None,
            system_dirs: Vec::new(),
            vars: HashMap::new(),
            config,
        }
    }

    /// Snapshot the current process: platform, PATH, home, and variables.
    pub fn from_process(runner: &'a dyn CommandRunner, config: RuntimeConfig) -> Self {
        Self {
            runner,
            platform: Platform::current(),
            arch: Arch::current(),
            path_entries: locate::parse_system_path(),
            home: dirs::home_dir(),
            system_dirs: locate::default_system_dirs(),
            vars: std::env::vars().collect(),
            config,
        }
    }

    pub fn with_path_entries(mut self, entries: Vec<PathBuf>) -> Self {
        self.path_entries = entries;
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn with_system_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.system_dirs = dirs;
        self
    }

    /// Replace the environment variable snapshot.
    pub fn with_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.vars = vars;
        self
    }

    pub fn with_arch(mut self, arch: Option<Arch>) -> Self {
        self.arch = arch;
        self
    }

    pub fn with_var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner
    }

    /// Look up an environment variable (case-insensitive fallback, as on Windows).
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .or_else(|| {
                self.vars
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Bundle target for this platform and architecture.
    pub fn bundle_target(&self) -> Option<BundleTarget> {
        BundleTarget::from_parts(self.platform, self.arch?)
    }

    /// Find a tool on PATH, then at the given fallback locations.
    pub fn locate(&self, tool: &str, well_known: &[PathBuf]) -> (Option<PathBuf>, usize) {
        locate::locate_tool(tool, &self.path_entries, well_known, self.platform)
    }

    /// `binary` inside each fixed system directory, skipped on Windows.
    pub fn system_paths(&self, binary: &str) -> Vec<PathBuf> {
        if self.platform.is_windows() {
            return Vec::new();
        }
        self.system_dirs.iter().map(|dir| dir.join(binary)).collect()
    }

    /// Join a path onto a Windows directory variable such as `ProgramFiles`.
    pub fn var_path(&self, key: &str, rest: &str) -> Option<PathBuf> {
        self.var(key).map(|base| Path::new(base).join(rest))
    }

    /// Run `<path> --version` and extract the version.
    ///
    /// A run that succeeds but prints no version returns `Ok(None)`.
    pub fn query_version(&self, tool: &str, path: &Path) -> Result<Option<String>, DetectionFailure> {
        let request = ProbeRequest::new(path)
            .arg("--version")
            .timeout(self.config.probe_timeout());

        let output = self
            .runner
            .run(&request)
            .map_err(|e| DetectionFailure::Unusable {
                tool: tool.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if !output.success() {
            let detail = output.combined();
            let reason = match output.exit_code {
                Some(code) if detail.is_empty() => format!("exited with code {}", code),
                Some(code) => format!("exited with code {}: {}", code, detail),
                None => "terminated by signal".to_string(),
            };
            return Err(DetectionFailure::Unusable {
                tool: tool.to_string(),
                path: path.to_path_buf(),
                reason,
            });
        }

        let version = extract_version(&output.stdout).or_else(|| extract_version(&output.stderr));
        if version.is_none() {
            tracing::debug!(
                "{}",
                DetectionFailure::VersionUnparsable {
                    tool: tool.to_string(),
                    output: output.combined(),
                }
            );
        }
        Ok(version)
    }

    /// Locate a single-strategy tool and query its version.
    ///
    /// Shared by the Node and Git detectors.
    pub(crate) fn detect_simple(&self, tool: &str, binary: &str, well_known: &[PathBuf]) -> ToolStatus {
        let (found, searched) = self.locate(binary, well_known);
        let Some(path) = found else {
            return ToolStatus::unavailable(DetectionFailure::NotFound {
                tool: tool.to_string(),
                searched,
            });
        };

        match self.query_version(tool, &path) {
            Ok(version) => ToolStatus::found(path, version),
            Err(failure) => ToolStatus::unavailable(failure),
        }
    }
}
