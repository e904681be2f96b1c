//! Git Bash detection (Windows only).
//!
//! Git for Windows ships an MSYS2 `bash.exe` under `<root>\bin`. A `bash`
//! found on PATH is only accepted when it lives inside a Git install:
//! `C:\Windows\System32\bash.exe` is the WSL launcher, not Git Bash.

use super::git::git_install_roots;
use super::{DetectContext, DetectionFailure, ToolStatus};
use crate::probe::locate::{first_executable, resolve_tool_path};
use std::path::{Path, PathBuf};

/// Display name used in status messages.
pub const TOOL: &str = "Git Bash";

/// Locate Git's bash and query `bash --version`.
pub fn detect(ctx: &DetectContext<'_>) -> ToolStatus {
    if !ctx.platform.is_windows() {
        return ToolStatus::unavailable(DetectionFailure::PlatformMismatch);
    }

    let candidates = candidate_paths(ctx);
    let Some(path) = first_executable(&candidates) else {
        return ToolStatus::unavailable(DetectionFailure::NotFound {
            tool: TOOL.to_string(),
            searched: candidates.len(),
        });
    };

    tracing::debug!("{}: trying {}", TOOL, path.display());
    match ctx.query_version(TOOL, &path) {
        Ok(version) => ToolStatus::found(path, version),
        Err(failure) => ToolStatus::unavailable(failure),
    }
}

/// Candidate `bash.exe` locations, in preference order.
///
/// 1. `bash` on PATH, if inside a Git install
/// 2. `<root>\bin\bash.exe` for the `git` found on PATH
/// 3. Standard Git for Windows install roots
pub fn candidate_paths(ctx: &DetectContext<'_>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(bash) = resolve_tool_path("bash", &ctx.path_entries, ctx.platform) {
        if is_git_bash_path(&bash) {
            candidates.push(bash);
        } else {
            tracing::debug!("{}: ignoring non-Git bash at {}", TOOL, bash.display());
        }
    }

    if let Some(root) = resolve_tool_path("git", &ctx.path_entries, ctx.platform)
        .as_deref()
        .and_then(git_root_from_exe)
    {
        push_unique(&mut candidates, bash_under(&root));
    }

    for root in git_install_roots(ctx) {
        push_unique(&mut candidates, bash_under(&root));
    }

    candidates
}

fn bash_under(root: &Path) -> PathBuf {
    root.join("bin").join("bash.exe")
}

fn push_unique(candidates: &mut Vec<PathBuf>, path: PathBuf) {
    if !candidates.contains(&path) {
        candidates.push(path);
    }
}

/// Whether a bash path sits inside a Git install rather than System32.
pub fn is_git_bash_path(path: &Path) -> bool {
    let mut in_git = false;
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.eq_ignore_ascii_case("system32") {
            return false;
        }
        if name.eq_ignore_ascii_case("git") {
            in_git = true;
        }
    }
    in_git
}

/// Derive the Git install root from a `git.exe` path.
///
/// Handles `<root>\cmd\git.exe`, `<root>\bin\git.exe`, and
/// `<root>\mingw64\bin\git.exe`.
pub fn git_root_from_exe(git: &Path) -> Option<PathBuf> {
    let parent = git.parent()?;
    let parent_name = parent.file_name()?.to_string_lossy().to_lowercase();
    match parent_name.as_str() {
        "cmd" => parent.parent().map(Path::to_path_buf),
        "bin" => {
            let grandparent = parent.parent()?;
            let name = grandparent.file_name()?.to_string_lossy().to_lowercase();
            if name == "mingw64" || name == "mingw32" {
                grandparent.parent().map(Path::to_path_buf)
            } else {
                Some(grandparent.to_path_buf())
            }
        }
        _ => None,
    }
}
