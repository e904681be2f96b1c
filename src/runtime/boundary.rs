//! Operations exposed to the host application.
//!
//! Thin wrappers over the [global](super::global) coordinator whose return
//! values serialize to the camelCase JSON the UI consumes.

use super::{global, GitRepoStatus, RuntimeStatus};
use crate::error::Result;
use std::path::Path;
use std::sync::Arc;

/// The cached runtime status, or `None` before initialization.
pub fn get_runtime_status() -> Option<Arc<RuntimeStatus>> {
    global().get_runtime_status()
}

/// The cached runtime status as JSON (`null` before initialization).
pub fn get_runtime_status_json() -> Result<String> {
    let status = get_runtime_status();
    Ok(serde_json::to_string(&status.as_deref()).map_err(anyhow::Error::from)?)
}

/// Git state of one directory.
pub fn get_git_repo_status(path: impl AsRef<Path>) -> GitRepoStatus {
    global().get_git_repo_status(path.as_ref())
}
