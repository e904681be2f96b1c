//! Git detection.

use super::{DetectContext, ToolStatus};
use std::path::PathBuf;

/// Display name used in status messages.
pub const TOOL: &str = "Git";

/// Locate `git` and query `git --version`.
pub fn detect(ctx: &DetectContext<'_>) -> ToolStatus {
    let status = ctx.detect_simple(TOOL, "git", &well_known_paths(ctx));
    tracing::debug!("{}: available={}", TOOL, status.available);
    status
}

/// Install locations checked when `git` is not on PATH.
pub fn well_known_paths(ctx: &DetectContext<'_>) -> Vec<PathBuf> {
    if ctx.platform.is_windows() {
        return git_install_roots(ctx)
            .into_iter()
            .map(|root| root.join("cmd").join("git.exe"))
            .collect();
    }

    ctx.system_paths("git")
}

/// Standard Git for Windows install roots, in preference order.
pub fn git_install_roots(ctx: &DetectContext<'_>) -> Vec<PathBuf> {
    [
        ctx.var_path("ProgramFiles", "Git"),
        ctx.var_path("ProgramFiles(x86)", "Git"),
        ctx.var_path("LOCALAPPDATA", "Programs").map(|p| p.join("Git")),
    ]
    .into_iter()
    .flatten()
    .collect()
}
