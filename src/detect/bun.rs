//! Bun detection.
//!
//! Three strategies are tried in order, and the first binary that runs and
//! reports a version wins:
//!
//! 1. **system** - `bun` on PATH or in `~/.bun/bin`. A user-managed install
//!    always takes precedence.
//! 2. **bundled** - the copy shipped with the application, under
//!    `<resources>/bun/<target>/`.
//! 3. **vendor** - a development checkout's `<vendor>/bun/<target>/`, only
//!    in dev mode.

use super::{BunSource, BunStatus, DetectContext, DetectionFailure};
use std::path::PathBuf;

/// Display name used in status messages.
pub const TOOL: &str = "Bun";

/// Strategy order. System must come first.
const STRATEGIES: [BunSource; 3] = [BunSource::System, BunSource::Bundled, BunSource::Vendor];

/// Run the strategies in order and report the first that works.
pub fn detect(ctx: &DetectContext<'_>) -> BunStatus {
    let mut attempts = Vec::with_capacity(STRATEGIES.len());

    for source in STRATEGIES {
        match try_strategy(ctx, source) {
            Ok((path, version)) => {
                tracing::debug!("{}: using {} binary at {}", TOOL, source, path.display());
                return BunStatus::found(path, version, source);
            }
            Err(reason) => {
                tracing::debug!("{}: {} strategy failed: {}", TOOL, source, reason);
                attempts.push(format!("{}: {}", source, reason));
            }
        }
    }

    BunStatus::unavailable(format!("{} not available ({})", TOOL, attempts.join("; ")))
}

/// Attempt one strategy, returning the binary and its version.
fn try_strategy(ctx: &DetectContext<'_>, source: BunSource) -> Result<(PathBuf, String), String> {
    let path = match source {
        BunSource::System => {
            let (found, searched) = ctx.locate("bun", &user_install_paths(ctx));
            found.ok_or_else(|| {
                DetectionFailure::NotFound {
                    tool: TOOL.to_string(),
                    searched,
                }
                .to_string()
            })?
        }
        BunSource::Bundled => {
            let candidate = bundled_path(ctx)?;
            require_executable(candidate)?
        }
        BunSource::Vendor => {
            if !ctx.config.dev_mode {
                return Err("disabled outside development builds".to_string());
            }
            let candidate = vendor_path(ctx)?;
            require_executable(candidate)?
        }
    };

    match ctx.query_version(TOOL, &path) {
        Ok(Some(version)) => Ok((path, version)),
        Ok(None) => Err(format!("{} reported no version", path.display())),
        Err(failure) => Err(failure.to_string()),
    }
}

fn require_executable(candidate: PathBuf) -> Result<PathBuf, String> {
    if crate::probe::locate::is_executable(&candidate) {
        Ok(candidate)
    } else {
        Err(format!("no binary at {}", candidate.display()))
    }
}

/// Default `bun` install locations outside PATH.
pub fn user_install_paths(ctx: &DetectContext<'_>) -> Vec<PathBuf> {
    let exe = format!("bun{}", ctx.platform.exe_suffix());
    let mut paths = Vec::new();
    if let Some(install) = ctx.var("BUN_INSTALL") {
        paths.push(PathBuf::from(install).join("bin").join(&exe));
    }
    if let Some(home) = &ctx.home {
        paths.push(home.join(".bun").join("bin").join(&exe));
    }
    paths.extend(ctx.system_paths("bun"));
    paths
}

/// Path of the application-bundled binary for this platform.
pub fn bundled_path(ctx: &DetectContext<'_>) -> Result<PathBuf, String> {
    target_path(ctx, ctx.config.resources_dir())
}

/// Path of the development vendor binary for this platform.
pub fn vendor_path(ctx: &DetectContext<'_>) -> Result<PathBuf, String> {
    target_path(ctx, ctx.config.vendor_dir())
}

fn target_path(ctx: &DetectContext<'_>, root: PathBuf) -> Result<PathBuf, String> {
    let target = ctx.bundle_target().ok_or_else(|| {
        format!(
            "no bundled runtime for {} on {:?}",
            ctx.platform,
            ctx.arch.map(|a| format!("{:?}", a)).unwrap_or_else(|| "this CPU".into())
        )
    })?;
    let info = target.info();
    Ok(root.join("bun").join(info.dir_name).join(info.bun_executable))
}
