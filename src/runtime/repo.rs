//! Git repository point query.

use crate::probe::command::{CommandRunner, ProbeOutput, ProbeRequest};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// State of one working directory, as Git sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepoStatus {
    pub is_repo: bool,
    /// Current branch; `None` on a detached HEAD.
    pub branch: Option<String>,
    /// Whether `git status --porcelain` reports anything.
    pub has_changes: bool,
    /// URL of the `origin` remote, if configured.
    pub remote_url: Option<String>,
}

impl GitRepoStatus {
    pub fn not_a_repo() -> Self {
        Self::default()
    }
}

/// Query `dir` with the given `git` binary.
///
/// Never fails: a missing Git, a missing directory, or a directory outside
/// any work tree all report `is_repo: false`.
pub fn query_repo_status(
    runner: &dyn CommandRunner,
    git: &Path,
    dir: &Path,
    timeout: Duration,
) -> GitRepoStatus {
    let git_cmd = |args: &[&str]| -> Option<ProbeOutput> {
        let request = ProbeRequest::new(git)
            .args(args.iter().copied())
            .cwd(dir)
            .timeout(timeout);
        match runner.run(&request) {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::debug!("git query in {} failed: {}", dir.display(), e);
                None
            }
        }
    };
    let stdout_of = |args: &[&str]| -> Option<String> {
        git_cmd(args)
            .filter(ProbeOutput::success)
            .map(|output| output.stdout.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    if !dir.is_dir() {
        return GitRepoStatus::not_a_repo();
    }

    if stdout_of(&["rev-parse", "--is-inside-work-tree"]).as_deref() != Some("true") {
        return GitRepoStatus::not_a_repo();
    }

    // symbolic-ref fails on a detached HEAD and still works before the first commit.
    let branch = stdout_of(&["symbolic-ref", "--short", "-q", "HEAD"]);

    let has_changes = git_cmd(&["status", "--porcelain"])
        .filter(ProbeOutput::success)
        .map(|output| !output.stdout.trim().is_empty())
        .unwrap_or(false);

    let remote_url = stdout_of(&["config", "--get", "remote.origin.url"]);

    GitRepoStatus {
        is_repo: true,
        branch,
        has_changes,
        remote_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProbeError, Result};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Answers git subcommands by their joined arguments.
    #[derive(Default)]
    struct GitScript {
        responses: HashMap<String, ProbeOutput>,
        calls: Mutex<Vec<String>>,
    }

    impl GitScript {
        fn on(mut self, args: &str, output: ProbeOutput) -> Self {
            self.responses.insert(args.to_string(), output);
            self
        }
    }

    impl CommandRunner for GitScript {
        fn run(&self, request: &ProbeRequest) -> Result<ProbeOutput> {
            let key = request.args.join(" ");
            self.calls.lock().unwrap().push(key.clone());
            self.responses
                .get(&key)
                .cloned()
                .ok_or_else(|| ProbeError::Spawn {
                    command: request.display(),
                    message: "unexpected".into(),
                })
        }
    }

    fn query(runner: &GitScript, dir: &Path) -> GitRepoStatus {
        query_repo_status(runner, Path::new("git"), dir, Duration::from_secs(5))
    }

    #[test]
    fn reports_branch_changes_and_remote() {
        let temp = TempDir::new().unwrap();
        let runner = GitScript::default()
            .on("rev-parse --is-inside-work-tree", ProbeOutput::ok("true\n"))
            .on("symbolic-ref --short -q HEAD", ProbeOutput::ok("main\n"))
            .on("status --porcelain", ProbeOutput::ok(" M src/lib.rs\n"))
            .on(
                "config --get remote.origin.url",
                ProbeOutput::ok("git@github.com:acme/app.git\n"),
            );

        let status = query(&runner, temp.path());
        assert_eq!(
            status,
            GitRepoStatus {
                is_repo: true,
                branch: Some("main".into()),
                has_changes: true,
                remote_url: Some("git@github.com:acme/app.git".into()),
            }
        );
    }

    #[test]
    fn detached_head_has_no_branch() {
        let temp = TempDir::new().unwrap();
        let runner = GitScript::default()
            .on("rev-parse --is-inside-work-tree", ProbeOutput::ok("true"))
            .on("symbolic-ref --short -q HEAD", ProbeOutput::failed(1, ""))
            .on("status --porcelain", ProbeOutput::ok(""))
            .on("config --get remote.origin.url", ProbeOutput::failed(1, ""));

        let status = query(&runner, temp.path());
        assert!(status.is_repo);
        assert_eq!(status.branch, None);
        assert!(!status.has_changes);
        assert_eq!(status.remote_url, None);
    }

    #[test]
    fn outside_work_tree_is_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let runner = GitScript::default().on(
            "rev-parse --is-inside-work-tree",
            ProbeOutput::failed(128, "fatal: not a git repository"),
        );

        let status = query(&runner, temp.path());
        assert_eq!(status, GitRepoStatus::not_a_repo());
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn missing_git_is_not_a_repo() {
        let temp = TempDir::new().unwrap();
        let runner = GitScript::default();
        assert!(!query(&runner, temp.path()).is_repo);
    }

    #[test]
    fn missing_directory_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = GitScript::default();
        let status = query(&runner, &temp.path().join("gone"));
        assert!(!status.is_repo);
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(GitRepoStatus::not_a_repo()).unwrap();
        assert_eq!(json["isRepo"], false);
        assert!(json["remoteUrl"].is_null());
        assert_eq!(json["hasChanges"], false);
    }
}
