//! Initialization options.

use serde::{Deserialize, Serialize};

/// Per-step skip flags for [`initialize_runtime`](super::RuntimeCoordinator::initialize_runtime).
///
/// Every flag is optional and defaults to running the step. A skipped
/// detector still produces a status, marked unavailable with a skip message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeInitOptions {
    pub skip_env_load: Option<bool>,
    pub skip_node_detection: Option<bool>,
    pub skip_bun_detection: Option<bool>,
    pub skip_git_detection: Option<bool>,
    pub skip_shell_detection: Option<bool>,
}

impl RuntimeInitOptions {
    pub const SKIP_ENV_LOAD: &'static str = "skipEnvLoad";
    pub const SKIP_NODE: &'static str = "skipNodeDetection";
    pub const SKIP_BUN: &'static str = "skipBunDetection";
    pub const SKIP_GIT: &'static str = "skipGitDetection";
    pub const SKIP_SHELL: &'static str = "skipShellDetection";

    pub fn skips_env_load(&self) -> bool {
        self.skip_env_load.unwrap_or(false)
    }

    pub fn skips_node(&self) -> bool {
        self.skip_node_detection.unwrap_or(false)
    }

    pub fn skips_bun(&self) -> bool {
        self.skip_bun_detection.unwrap_or(false)
    }

    pub fn skips_git(&self) -> bool {
        self.skip_git_detection.unwrap_or(false)
    }

    pub fn skips_shell(&self) -> bool {
        self.skip_shell_detection.unwrap_or(false)
    }

    /// Options that skip every step. Handy for tests and dry runs.
    pub fn skip_all() -> Self {
        Self {
            skip_env_load: Some(true),
            skip_node_detection: Some(true),
            skip_bun_detection: Some(true),
            skip_git_detection: Some(true),
            skip_shell_detection: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_everything() {
        let options = RuntimeInitOptions::default();
        assert!(!options.skips_env_load());
        assert!(!options.skips_node());
        assert!(!options.skips_bun());
        assert!(!options.skips_git());
        assert!(!options.skips_shell());
    }

    #[test]
    fn deserializes_camel_case_json() {
        let options: RuntimeInitOptions =
            serde_json::from_str(r#"{"skipGitDetection": true, "skipEnvLoad": false}"#).unwrap();
        assert!(options.skips_git());
        assert_eq!(options.skip_env_load, Some(false));
        assert_eq!(options.skip_node_detection, None);
    }

    #[test]
    fn empty_object_is_default() {
        let options: RuntimeInitOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RuntimeInitOptions::default());
    }
}
