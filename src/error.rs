//! Error types for envprobe operations.
//!
//! This module defines [`ProbeError`], the error type returned by the
//! process probe and the runtime coordinator, and a [`Result`] alias.
//!
//! # Error Handling Strategy
//!
//! - Detection outcomes are data, not errors: detectors fold every probe
//!   failure into a status record (see [`crate::detect::DetectionFailure`])
//! - `ProbeError` is for the probe primitive and for genuinely unexpected
//!   coordinator failures
//! - Use `anyhow::Error` (via `ProbeError::Other`) for context-rich config errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envprobe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The external process could not be started or waited on.
    #[error("Failed to run '{command}': {message}")]
    Spawn { command: String, message: String },

    /// The external process did not finish within its timeout.
    #[error("'{command}' timed out after {timeout_ms}ms")]
    TimedOut { command: String, timeout_ms: u64 },

    /// A detector thread panicked during initialization.
    #[error("Detector '{detector}' failed unexpectedly")]
    DetectorPanicked { detector: String },

    /// Failed to read or parse the configuration file.
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envprobe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_displays_command_and_message() {
        let err = ProbeError::Spawn {
            command: "git --version".into(),
            message: "permission denied".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("git --version"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn timed_out_displays_timeout() {
        let err = ProbeError::TimedOut {
            command: "wsl.exe -l -v".into(),
            timeout_ms: 10000,
        };
        assert!(err.to_string().contains("10000ms"));
    }

    #[test]
    fn detector_panicked_displays_detector() {
        let err = ProbeError::DetectorPanicked {
            detector: "bun".into(),
        };
        assert!(err.to_string().contains("bun"));
    }

    #[test]
    fn config_displays_path() {
        let err = ProbeError::Config {
            path: PathBuf::from("/etc/envprobe.yml"),
            message: "bad yaml".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/envprobe.yml"));
        assert!(msg.contains("bad yaml"));
    }

    #[test]
    fn anyhow_context_is_preserved() {
        let err: ProbeError = anyhow::anyhow!("file missing")
            .context("Failed to read config file /tmp/x.yml")
            .into();
        assert!(matches!(err, ProbeError::Other(_)));
        assert_eq!(err.to_string(), "Failed to read config file /tmp/x.yml");
    }
}
