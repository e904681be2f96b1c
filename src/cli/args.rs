//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::runtime::RuntimeInitOptions;

/// envprobe - Discover Node.js, Bun, Git, and Windows shells.
#[derive(Debug, Parser)]
#[command(name = "envprobe")]
#[command(
    author,
    version,
    about = "envprobe - Discover Node.js, Bun, Git, and Windows shells.",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides the user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of styled text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect runtimes and print their status (default)
    Status(StatusArgs),

    /// Show Git state of a directory
    Repo(RepoArgs),
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Do not import the login shell environment
    #[arg(long)]
    pub skip_env_load: bool,

    /// Do not detect Node.js
    #[arg(long)]
    pub skip_node: bool,

    /// Do not detect Bun
    #[arg(long)]
    pub skip_bun: bool,

    /// Do not detect Git
    #[arg(long)]
    pub skip_git: bool,

    /// Do not detect Git Bash or WSL (Windows)
    #[arg(long)]
    pub skip_shell: bool,
}

impl StatusArgs {
    /// Convert flags to init options. Unset flags stay `None`.
    pub fn to_options(&self) -> RuntimeInitOptions {
        let flag = |set: bool| set.then_some(true);
        RuntimeInitOptions {
            skip_env_load: flag(self.skip_env_load),
            skip_node_detection: flag(self.skip_node),
            skip_bun_detection: flag(self.skip_bun),
            skip_git_detection: flag(self.skip_git),
            skip_shell_detection: flag(self.skip_shell),
        }
    }
}

/// Arguments for the `repo` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RepoArgs {
    /// Directory to inspect (defaults to the current directory)
    pub path: Option<PathBuf>,
}
