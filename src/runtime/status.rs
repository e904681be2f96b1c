//! Aggregate runtime status.

use crate::detect::{BunStatus, ShellEnvironmentStatus, ToolStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything one initialization discovered.
///
/// Built whole by the coordinator and never mutated afterwards. `shell` is
/// present exactly when the detectors ran as Windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeStatus {
    pub node: ToolStatus,
    pub bun: BunStatus,
    pub git: ToolStatus,
    pub shell: Option<ShellEnvironmentStatus>,
    pub env_loaded: bool,
    pub initialized_at: DateTime<Utc>,
}

/// One line of [`RuntimeStatus::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub available: bool,
    pub detail: String,
}

impl RuntimeStatus {
    /// Per-tool availability lines, in display order.
    pub fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine {
                label: "Node.js",
                available: self.node.available,
                detail: self.node.describe(),
            },
            SummaryLine {
                label: "Bun",
                available: self.bun.available,
                detail: self.bun.describe(),
            },
            SummaryLine {
                label: "Git",
                available: self.git.available,
                detail: self.git.describe(),
            },
        ];

        if let Some(shell) = &self.shell {
            lines.push(SummaryLine {
                label: "Git Bash",
                available: shell.git_bash.available,
                detail: shell.git_bash.describe(),
            });
            lines.push(SummaryLine {
                label: "WSL",
                available: shell.wsl.available,
                detail: shell.wsl.describe(),
            });
        }

        lines
    }

    /// Number of top-level tools (Node, Bun, Git) that are usable.
    pub fn available_count(&self) -> usize {
        [self.node.available, self.bun.available, self.git.available]
            .iter()
            .filter(|a| **a)
            .count()
    }

    /// Whether two statuses match apart from their timestamps.
    pub fn same_outcome(&self, other: &RuntimeStatus) -> bool {
        self.node == other.node
            && self.bun == other.bun
            && self.git == other.git
            && self.shell == other.shell
            && self.env_loaded == other.env_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{BunSource, WslStatus};
    use std::path::PathBuf;

    fn status(shell: Option<ShellEnvironmentStatus>) -> RuntimeStatus {
        RuntimeStatus {
            node: ToolStatus::found(PathBuf::from("/usr/bin/node"), Some("20.11.1".into())),
            bun: BunStatus::found(PathBuf::from("/opt/bun"), "1.1.30".into(), BunSource::Bundled),
            git: ToolStatus::unavailable("Git detection skipped (skipGitDetection=true)"),
            shell,
            env_loaded: true,
            initialized_at: Utc::now(),
        }
    }

    #[test]
    fn summary_lists_core_tools() {
        let lines = status(None).summary();
        let labels: Vec<_> = lines.iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Node.js", "Bun", "Git"]);
        assert_eq!(lines[0].detail, "20.11.1 (/usr/bin/node)");
        assert_eq!(lines[1].detail, "1.1.30 (bundled, /opt/bun)");
        assert!(!lines[2].available);
        assert!(lines[2].detail.contains("skipped"));
    }

    #[test]
    fn summary_includes_shell_on_windows() {
        let shell = ShellEnvironmentStatus {
            git_bash: ToolStatus::unavailable("Git Bash not found"),
            wsl: WslStatus::unavailable("WSL is not installed"),
            recommended: None,
        };
        assert_eq!(status(Some(shell)).summary().len(), 5);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(status(None)).unwrap();
        assert_eq!(json["envLoaded"], true);
        assert!(json["initializedAt"].is_string());
        assert!(json["shell"].is_null());
        assert_eq!(json["bun"]["source"], "bundled");
        assert_eq!(json["git"]["available"], false);
    }

    #[test]
    fn same_outcome_ignores_timestamp() {
        let a = status(None);
        let mut b = a.clone();
        b.initialized_at = a.initialized_at + chrono::Duration::seconds(5);
        assert_ne!(a, b);
        assert!(a.same_outcome(&b));
        assert_eq!(a.available_count(), 2);
    }
}
