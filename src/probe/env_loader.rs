//! Login-shell environment import.
//!
//! Applications launched from a desktop environment (Finder, Dock, a
//! launcher) do not run the user's login shell, so PATH additions from
//! `.zprofile`, `.bashrc` and friends are missing. The loader runs the
//! user's shell once as an interactive login shell, captures its
//! environment, and copies anything missing or different into this process.

use crate::error::{ProbeError, Result};
use crate::platform::Platform;
use crate::probe::command::{CommandRunner, ProbeRequest};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

const START_MARKER: &str = "__ENVPROBE_ENV_START__";
const END_MARKER: &str = "__ENVPROBE_ENV_END__";

/// Variables describing the spawned shell itself rather than the user's setup.
const IGNORED_VARS: &[&str] = &["PWD", "OLDPWD", "SHLVL", "_"];

/// Outcome of an environment import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvLoadResult {
    pub success: bool,
    pub loaded_count: usize,
    pub error: Option<String>,
}

impl EnvLoadResult {
    fn loaded(count: usize) -> Self {
        Self {
            success: true,
            loaded_count: count,
            error: None,
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            loaded_count: 0,
            error: Some(error.to_string()),
        }
    }
}

/// Imports the interactive login shell's environment into this process.
pub struct ShellEnvLoader<'a> {
    runner: &'a dyn CommandRunner,
    platform: Platform,
    shell: PathBuf,
    timeout: Duration,
}

impl<'a> ShellEnvLoader<'a> {
    /// Create a loader using `$SHELL` (or `/bin/sh`).
    pub fn new(runner: &'a dyn CommandRunner, platform: Platform, timeout: Duration) -> Self {
        let shell = std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"));
        Self {
            runner,
            platform,
            shell,
            timeout,
        }
    }

    /// Override the shell executable.
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Capture the shell environment and apply it to the current process.
    ///
    /// Never fails; errors are reported in the result.
    pub fn load(&self) -> EnvLoadResult {
        if self.platform.is_windows() {
            // GUI launches inherit the user environment from Explorer.
            return EnvLoadResult::loaded(0);
        }

        match self.capture() {
            Ok(vars) => {
                let count = apply_env(
                    &vars,
                    |key| std::env::var(key).ok(),
                    |key, value| std::env::set_var(key, value),
                );
                tracing::debug!("Imported {} variable(s) from {}", count, self.shell.display());
                EnvLoadResult::loaded(count)
            }
            Err(e) => {
                tracing::warn!("Could not load shell environment: {}", e);
                EnvLoadResult::failed(e)
            }
        }
    }

    /// Run the shell and return the variables it reports.
    pub fn capture(&self) -> Result<Vec<(String, String)>> {
        let script = format!(
            "printf '%s' '{}'; env -0; printf '%s' '{}'",
            START_MARKER, END_MARKER
        );
        let request = ProbeRequest::new(&self.shell)
            .args([shell_flag(), script.as_str()])
            .timeout(self.timeout);
        let output = self.runner.run(&request)?;

        let vars = parse_env_dump(&output.stdout);
        if vars.is_empty() {
            return Err(ProbeError::Spawn {
                command: request.display(),
                message: format!(
                    "shell produced no environment (exit code {:?})",
                    output.exit_code
                ),
            });
        }
        Ok(vars)
    }
}

/// Flags that start an interactive login shell.
///
/// In CI there is no TTY, and `-i` fails with "cannot set terminal process
/// group", so only a login shell is requested.
fn shell_flag() -> &'static str {
    if is_ci() {
        "-lc"
    } else {
        "-ilc"
    }
}

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Extract `KEY=VALUE` pairs from NUL-separated `env -0` output.
///
/// Only the region between the start and end markers is parsed, so banner
/// text printed by rc files is ignored. Returns an empty list when the
/// markers are missing.
pub fn parse_env_dump(output: &str) -> Vec<(String, String)> {
    let Some(start) = output.find(START_MARKER) else {
        return Vec::new();
    };
    let body = &output[start + START_MARKER.len()..];
    let Some(end) = body.find(END_MARKER) else {
        return Vec::new();
    };

    body[..end]
        .split('\0')
        .filter_map(|entry| {
            let entry = entry.trim_start_matches('\n');
            let (key, value) = entry.split_once('=')?;
            if key.is_empty() || IGNORED_VARS.contains(&key) {
                return None;
            }
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Apply variables that are missing or different, returning how many changed.
pub fn apply_env<G, S>(vars: &[(String, String)], get: G, mut set: S) -> usize
where
    G: Fn(&str) -> Option<String>,
    S: FnMut(&str, &str),
{
    let mut count = 0;
    for (key, value) in vars {
        if get(key).as_deref() != Some(value.as_str()) {
            set(key, value);
            count += 1;
        }
    }
    count
}
