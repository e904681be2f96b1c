//! Repo command implementation.
//!
//! The `envprobe repo [path]` command prints the Git state of a directory.

use std::path::PathBuf;

use crate::cli::args::RepoArgs;
use crate::error::Result;
use crate::runtime::{GitRepoStatus, RuntimeCoordinator};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The repo command implementation.
pub struct RepoCommand<'a> {
    coordinator: &'a RuntimeCoordinator,
    args: RepoArgs,
    json: bool,
}

impl<'a> RepoCommand<'a> {
    pub fn new(coordinator: &'a RuntimeCoordinator, args: RepoArgs, json: bool) -> Self {
        Self {
            coordinator,
            args,
            json,
        }
    }

    fn target(&self) -> Result<PathBuf> {
        match &self.args.path {
            Some(path) => Ok(path.clone()),
            None => Ok(std::env::current_dir().map_err(anyhow::Error::from)?),
        }
    }
}

impl Command for RepoCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let dir = self.target()?;
        let status = self.coordinator.get_git_repo_status(&dir);

        if self.json {
            let text = serde_json::to_string_pretty(&status).map_err(anyhow::Error::from)?;
            ui.data(&text);
        } else {
            show_repo(ui, &dir.display().to_string(), &status);
        }
        Ok(CommandResult::success())
    }
}

fn show_repo(ui: &mut dyn UserInterface, dir: &str, status: &GitRepoStatus) {
    if !status.is_repo {
        ui.warning(&format!("{} is not a Git repository", dir));
        return;
    }

    ui.show_header(dir);
    ui.success(&format!(
        "Branch: {}",
        status.branch.as_deref().unwrap_or("(detached HEAD)")
    ));
    if status.has_changes {
        ui.warning("Working tree has uncommitted changes");
    } else {
        ui.success("Working tree clean");
    }
    ui.message(&format!(
        "Remote: {}",
        status.remote_url.as_deref().unwrap_or("(none)")
    ));
}
