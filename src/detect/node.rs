//! Node.js detection.

use super::{DetectContext, ToolStatus};
use std::path::PathBuf;

/// Display name used in status messages.
pub const TOOL: &str = "Node.js";

/// Locate `node` and query `node --version`.
pub fn detect(ctx: &DetectContext<'_>) -> ToolStatus {
    let status = ctx.detect_simple(TOOL, "node", &well_known_paths(ctx));
    tracing::debug!("{}: available={}", TOOL, status.available);
    status
}

/// Install locations checked when `node` is not on PATH.
///
/// GUI launches often miss version-manager shims, so the common managed
/// and package-manager locations are listed explicitly.
pub fn well_known_paths(ctx: &DetectContext<'_>) -> Vec<PathBuf> {
    if ctx.platform.is_windows() {
        let mut paths = Vec::new();
        if let Some(path) = ctx.var_path("ProgramFiles", r"nodejs\node.exe") {
            paths.push(path);
        }
        if let Some(path) = ctx.var_path("ProgramFiles(x86)", r"nodejs\node.exe") {
            paths.push(path);
        }
        if let Some(path) = ctx.var_path("APPDATA", r"nvm\current\node.exe") {
            paths.push(path);
        }
        if let Some(path) = ctx.var_path("LOCALAPPDATA", r"Volta\bin\node.exe") {
            paths.push(path);
        }
        return paths;
    }

    let mut paths = ctx.system_paths("node");
    if let Some(volta) = ctx.var("VOLTA_HOME") {
        paths.push(PathBuf::from(volta).join("bin/node"));
    }
    if let Some(home) = &ctx.home {
        paths.push(home.join(".volta/bin/node"));
        paths.push(home.join(".local/share/fnm/aliases/default/bin/node"));
        paths.push(home.join(".nvm/current/bin/node"));
    }
    paths
}
