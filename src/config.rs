//! Runtime detection configuration.
//!
//! Settings are layered in priority order (later overrides earlier):
//!
//! 1. Built-in defaults
//! 2. Config file (explicit `--config`, or `<config dir>/envprobe/config.yml`)
//! 3. `ENVPROBE_*` environment variables

use crate::error::{ProbeError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "ENVPROBE_";

/// Timeouts and search locations used during detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Timeout for a single `--version` query.
    pub probe_timeout_ms: u64,
    /// Timeout for the WSL distribution listing, which can start the WSL VM.
    pub wsl_timeout_ms: u64,
    /// Timeout for the login-shell environment import.
    pub env_load_timeout_ms: u64,
    /// Directory holding bundled runtimes (`<dir>/bun/<target>/bun`).
    pub resources_dir: Option<PathBuf>,
    /// Development vendor directory (`<dir>/bun/<target>/bun`).
    pub vendor_dir: Option<PathBuf>,
    /// Whether the vendor strategy is enabled.
    pub dev_mode: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            wsl_timeout_ms: 10_000,
            env_load_timeout_ms: 5_000,
            resources_dir: None,
            vendor_dir: None,
            dev_mode: cfg!(debug_assertions),
        }
    }
}

impl RuntimeConfig {
    /// Load a config file, with unspecified fields taking defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&content).map_err(|e| ProbeError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Build the effective config: defaults, then file, then environment.
    ///
    /// An explicit path must exist; the default user config is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.is_file()),
        };

        let config = match file {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        Ok(config.with_env_overrides(|key| std::env::var(key)))
    }

    /// Apply `ENVPROBE_*` overrides using a custom env lookup (for testing).
    pub fn with_env_overrides<F>(mut self, env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let var = |name: &str| env_fn(&format!("{}{}", ENV_PREFIX, name)).ok();

        if let Some(ms) = var("PROBE_TIMEOUT_MS").and_then(|v| parse_millis("PROBE_TIMEOUT_MS", &v)) {
            self.probe_timeout_ms = ms;
        }
        if let Some(ms) = var("WSL_TIMEOUT_MS").and_then(|v| parse_millis("WSL_TIMEOUT_MS", &v)) {
            self.wsl_timeout_ms = ms;
        }
        if let Some(ms) =
            var("ENV_LOAD_TIMEOUT_MS").and_then(|v| parse_millis("ENV_LOAD_TIMEOUT_MS", &v))
        {
            self.env_load_timeout_ms = ms;
        }
        if let Some(dir) = var("RESOURCES_DIR").filter(|v| !v.is_empty()) {
            self.resources_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = var("VENDOR_DIR").filter(|v| !v.is_empty()) {
            self.vendor_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = var("DEV_MODE") {
            self.dev_mode = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn wsl_timeout(&self) -> Duration {
        Duration::from_millis(self.wsl_timeout_ms)
    }

    pub fn env_load_timeout(&self) -> Duration {
        Duration::from_millis(self.env_load_timeout_ms)
    }

    /// Bundled resources directory, defaulting to `resources/` beside the executable.
    pub fn resources_dir(&self) -> PathBuf {
        self.resources_dir.clone().unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
                .unwrap_or_else(|| PathBuf::from("resources"))
        })
    }

    /// Vendor directory, defaulting to `vendor/` under the working directory.
    pub fn vendor_dir(&self) -> PathBuf {
        self.vendor_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("vendor"))
    }
}

/// User config location: `<config dir>/envprobe/config.yml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("envprobe").join("config.yml"))
}

fn parse_millis(name: &str, value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Some(ms),
        _ => {
            tracing::warn!("Ignoring invalid {}{}={:?}", ENV_PREFIX, name, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn make_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, std::env::VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned().ok_or(std::env::VarError::NotPresent)
    }

    #[test]
    fn defaults_are_sensible() {
        let config = RuntimeConfig::default();
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.wsl_timeout(), Duration::from_secs(10));
        assert_eq!(config.vendor_dir(), PathBuf::from("vendor"));
    }

    #[test]
    fn from_file_fills_missing_fields_with_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "probe_timeout_ms: 1500\nresources_dir: /opt/app/resources\n").unwrap();

        let config = RuntimeConfig::from_file(&path).unwrap();
        assert_eq!(config.probe_timeout_ms, 1500);
        assert_eq!(config.resources_dir(), PathBuf::from("/opt/app/resources"));
        assert_eq!(config.wsl_timeout_ms, 10_000);
    }

    #[test]
    fn from_file_rejects_bad_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "probe_timeout_ms: [not, a, number]\n").unwrap();

        let err = RuntimeConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ProbeError::Config { .. }));
    }

    #[test]
    fn load_with_missing_explicit_file_fails() {
        let err = RuntimeConfig::load(Some(Path::new("/nonexistent/envprobe.yml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/envprobe.yml"));
    }

    #[test]
    fn env_overrides_take_precedence() {
        let config = RuntimeConfig::default().with_env_overrides(make_env(&[
            ("ENVPROBE_PROBE_TIMEOUT_MS", "250"),
            ("ENVPROBE_VENDOR_DIR", "/src/app/vendor"),
            ("ENVPROBE_DEV_MODE", "true"),
        ]));
        assert_eq!(config.probe_timeout_ms, 250);
        assert_eq!(config.vendor_dir(), PathBuf::from("/src/app/vendor"));
        assert!(config.dev_mode);
    }

    #[test]
    fn invalid_env_override_is_ignored() {
        let config = RuntimeConfig::default().with_env_overrides(make_env(&[
            ("ENVPROBE_WSL_TIMEOUT_MS", "soon"),
            ("ENVPROBE_ENV_LOAD_TIMEOUT_MS", "0"),
        ]));
        assert_eq!(config.wsl_timeout_ms, 10_000);
        assert_eq!(config.env_load_timeout_ms, 5_000);
    }

    #[test]
    fn dev_mode_override_can_disable() {
        let config = RuntimeConfig {
            dev_mode: true,
            ..Default::default()
        }
        .with_env_overrides(make_env(&[("ENVPROBE_DEV_MODE", "0")]));
        assert!(!config.dev_mode);
    }
}
