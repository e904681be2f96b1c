//! Runtime initialization and the cached status.

use super::options::RuntimeInitOptions;
use super::repo::{query_repo_status, GitRepoStatus};
use super::status::RuntimeStatus;
use crate::config::RuntimeConfig;
use crate::detect::{
    bun, git, git_bash, node, shell_env, wsl, BunStatus, DetectContext, DetectionFailure,
    ShellEnvironmentStatus, ToolStatus, WslStatus,
};
use crate::error::{ProbeError, Result};
use crate::platform::Platform;
use crate::probe::command::{CommandRunner, SystemRunner};
use crate::probe::env_loader::ShellEnvLoader;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;

/// Owns detection and the process-wide [`RuntimeStatus`] cache.
///
/// The cache is only ever replaced whole, after a complete status has been
/// built. Readers see either the previous status or the new one.
pub struct RuntimeCoordinator {
    runner: Arc<dyn CommandRunner>,
    config: RuntimeConfig,
    platform: Option<Platform>,
    path_entries: Option<Vec<PathBuf>>,
    home: Option<PathBuf>,
    system_dirs: Option<Vec<PathBuf>>,
    env_vars: Option<HashMap<String, String>>,
    cache: RwLock<Option<Arc<RuntimeStatus>>>,
    init_lock: Mutex<()>,
}

impl RuntimeCoordinator {
    /// A coordinator that spawns real processes.
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_runner(Arc::new(SystemRunner), config)
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>, config: RuntimeConfig) -> Self {
        Self {
            runner,
            config,
            platform: None,
            path_entries: None,
            home: None,
            system_dirs: None,
            env_vars: None,
            cache: RwLock::new(None),
            init_lock: Mutex::new(()),
        }
    }

    /// Detect as if running on `platform` instead of the host OS.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Search these directories instead of the process PATH.
    pub fn with_path_entries(mut self, entries: Vec<PathBuf>) -> Self {
        self.path_entries = Some(entries);
        self
    }

    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Search these fixed directories instead of the host's system bin dirs.
    pub fn with_system_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.system_dirs = Some(dirs);
        self
    }

    /// Detect against this variable snapshot instead of the process environment.
    pub fn with_env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Effective platform for detection.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    /// The cached status, or `None` before the first initialization.
    pub fn get_runtime_status(&self) -> Option<Arc<RuntimeStatus>> {
        match self.cache.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Detect everything once and cache the result.
    ///
    /// Returns the cached status without detecting again if one exists.
    pub fn initialize_runtime(&self, options: &RuntimeInitOptions) -> Result<Arc<RuntimeStatus>> {
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(status) = self.get_runtime_status() {
            tracing::debug!("Runtime already initialized at {}", status.initialized_at);
            return Ok(status);
        }
        self.run_and_store(options)
    }

    /// Run detection again and replace the cached status.
    ///
    /// If detection fails unexpectedly the previous status stays cached.
    pub fn reinitialize_runtime(&self, options: &RuntimeInitOptions) -> Result<Arc<RuntimeStatus>> {
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        tracing::debug!("Reinitializing runtime");
        self.run_and_store(options)
    }

    /// Query one directory's Git state. Not cached.
    ///
    /// Uses the detected Git binary when available, else `git` from PATH.
    pub fn get_git_repo_status(&self, dir: &Path) -> GitRepoStatus {
        let git = self
            .get_runtime_status()
            .and_then(|status| status.git.path.clone())
            .unwrap_or_else(|| PathBuf::from("git"));
        query_repo_status(self.runner.as_ref(), &git, dir, self.config.probe_timeout())
    }

    fn run_and_store(&self, options: &RuntimeInitOptions) -> Result<Arc<RuntimeStatus>> {
        let status = Arc::new(self.detect_all(options)?);
        tracing::info!(
            "Runtime initialized: {}/3 tools available (env loaded: {})",
            status.available_count(),
            status.env_loaded
        );
        for line in status.summary() {
            tracing::debug!("  {}: {}", line.label, line.detail);
        }

        match self.cache.write() {
            Ok(mut guard) => *guard = Some(Arc::clone(&status)),
            Err(poisoned) => *poisoned.into_inner() = Some(Arc::clone(&status)),
        }
        Ok(status)
    }

    /// Build a complete status without touching the cache.
    fn detect_all(&self, options: &RuntimeInitOptions) -> Result<RuntimeStatus> {
        let platform = self.platform();
        let runner = self.runner.as_ref();

        // The environment must be in place before any detector reads PATH.
        let env_loaded = if options.skips_env_load() {
            tracing::debug!("Shell environment import skipped");
            false
        } else {
            ShellEnvLoader::new(runner, platform, self.config.env_load_timeout())
                .load()
                .success
        };

        let ctx = self.context(runner, platform);

        let (node, bun, git) = thread::scope(|s| {
            let node = s.spawn(|| {
                skip_or(options.skips_node(), node::TOOL, RuntimeInitOptions::SKIP_NODE, || {
                    node::detect(&ctx)
                })
            });
            let bun = s.spawn(|| {
                if options.skips_bun() {
                    BunStatus::unavailable(DetectionFailure::skipped(
                        bun::TOOL,
                        RuntimeInitOptions::SKIP_BUN,
                    ))
                } else {
                    bun::detect(&ctx)
                }
            });
            let git = s.spawn(|| {
                skip_or(options.skips_git(), git::TOOL, RuntimeInitOptions::SKIP_GIT, || {
                    git::detect(&ctx)
                })
            });
            let (node, bun, git) = (node.join(), bun.join(), git.join());
            Ok::<_, ProbeError>((
                joined(node, node::TOOL)?,
                joined(bun, bun::TOOL)?,
                joined(git, git::TOOL)?,
            ))
        })?;

        let shell = if platform.is_windows() {
            Some(detect_shell(&ctx, options)?)
        } else {
            None
        };

        Ok(RuntimeStatus {
            node,
            bun,
            git,
            shell,
            env_loaded,
            initialized_at: Utc::now(),
        })
    }

    fn context<'a>(&self, runner: &'a dyn CommandRunner, platform: Platform) -> DetectContext<'a> {
        let mut ctx = DetectContext::from_process(runner, self.config.clone());
        ctx.platform = platform;
        if let Some(entries) = &self.path_entries {
            ctx.path_entries = entries.clone();
        }
        if let Some(home) = &self.home {
            ctx.home = Some(home.clone());
        }
        if let Some(dirs) = &self.system_dirs {
            ctx.system_dirs = dirs.clone();
        }
        if let Some(vars) = &self.env_vars {
            ctx = ctx.with_vars(vars.clone());
        }
        ctx
    }
}

/// Git Bash and WSL concurrently, then the recommendation.
fn detect_shell(ctx: &DetectContext<'_>, options: &RuntimeInitOptions) -> Result<ShellEnvironmentStatus> {
    if options.skips_shell() {
        let flag = RuntimeInitOptions::SKIP_SHELL;
        return Ok(shell_env::resolve_shell_environment(
            ToolStatus::unavailable(DetectionFailure::skipped(git_bash::TOOL, flag)),
            WslStatus::unavailable(DetectionFailure::skipped(wsl::TOOL, flag)),
        ));
    }

    let (git_bash, wsl) = thread::scope(|s| {
        let git_bash = s.spawn(|| git_bash::detect(ctx));
        let wsl = s.spawn(|| wsl::detect(ctx));
        let (git_bash, wsl) = (git_bash.join(), wsl.join());
        Ok::<_, ProbeError>((joined(git_bash, git_bash::TOOL)?, joined(wsl, wsl::TOOL)?))
    })?;

    Ok(shell_env::resolve_shell_environment(git_bash, wsl))
}

fn skip_or<F>(skip: bool, tool: &str, flag: &str, detect: F) -> ToolStatus
where
    F: FnOnce() -> ToolStatus,
{
    if skip {
        tracing::debug!("{} detection skipped", tool);
        ToolStatus::unavailable(DetectionFailure::skipped(tool, flag))
    } else {
        detect()
    }
}

fn joined<T>(result: thread::Result<T>, detector: &str) -> Result<T> {
    result.map_err(|_| {
        tracing::warn!("{} detector panicked", detector);
        ProbeError::DetectorPanicked {
            detector: detector.to_string(),
        }
    })
}
