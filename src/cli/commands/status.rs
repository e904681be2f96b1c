//! Status command implementation.
//!
//! The `envprobe status` command initializes the runtime and prints what
//! was found.

use crate::cli::args::StatusArgs;
use crate::error::Result;
use crate::runtime::{RuntimeCoordinator, RuntimeStatus};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand<'a> {
    coordinator: &'a RuntimeCoordinator,
    args: StatusArgs,
    json: bool,
}

impl<'a> StatusCommand<'a> {
    pub fn new(coordinator: &'a RuntimeCoordinator, args: StatusArgs, json: bool) -> Self {
        Self {
            coordinator,
            args,
            json,
        }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &StatusArgs {
        &self.args
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let status = self.coordinator.initialize_runtime(&self.args.to_options())?;

        if self.json {
            let text = serde_json::to_string_pretty(status.as_ref()).map_err(anyhow::Error::from)?;
            ui.data(&text);
        } else {
            show_status(ui, &status);
        }

        // Missing tools are reported, not failures.
        Ok(CommandResult::success())
    }
}

/// Print one line per tool, then the shell recommendation on Windows.
pub fn show_status(ui: &mut dyn UserInterface, status: &RuntimeStatus) {
    ui.show_header("Runtime status");

    for line in status.summary() {
        let text = format!("{}: {}", line.label, line.detail);
        if line.available {
            ui.success(&text);
        } else {
            ui.warning(&text);
        }
    }

    if let Some(shell) = &status.shell {
        let recommended = shell
            .recommended
            .map(|env| env.to_string())
            .unwrap_or_else(|| "none".to_string());
        ui.message(&format!("Recommended shell: {}", recommended));
    }

    ui.message("");
    ui.message(&format!(
        "Shell environment {}; checked {}",
        if status.env_loaded { "loaded" } else { "not loaded" },
        status.initialized_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use crate::detect::test_support::ScriptedRunner;
    use crate::platform::Platform;
    use crate::ui::MockUI;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn coordinator(platform: Platform) -> (TempDir, RuntimeCoordinator) {
        let temp = TempDir::new().unwrap();
        let config = RuntimeConfig {
            resources_dir: Some(temp.path().join("resources")),
            dev_mode: false,
            ..Default::default()
        };
        let coordinator = RuntimeCoordinator::with_runner(Arc::new(ScriptedRunner::new()), config)
            .with_platform(platform)
            .with_path_entries(Vec::new())
            .with_home(temp.path());
        (temp, coordinator)
    }

    fn skip_everything() -> StatusArgs {
        StatusArgs {
            skip_env_load: true,
            skip_node: true,
            skip_bun: true,
            skip_git: true,
            skip_shell: true,
        }
    }

    #[test]
    fn skipped_tools_are_warnings() {
        let (_temp, coordinator) = coordinator(Platform::Linux);
        let mut ui = MockUI::new();
        let result = StatusCommand::new(&coordinator, skip_everything(), false)
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.headers(), ["Runtime status"]);
        assert!(ui.has_warning("Node.js: Node.js detection skipped"));
        assert!(ui.has_warning("Git: Git detection skipped (skipGitDetection=true)"));
        assert!(ui.successes().is_empty());
        assert!(ui.has_message("Shell environment not loaded"));
        assert!(!ui.has_message("Recommended shell"));
    }

    #[test]
    fn windows_shows_recommendation() {
        let (_temp, coordinator) = coordinator(Platform::Windows);
        let mut ui = MockUI::new();
        StatusCommand::new(&coordinator, skip_everything(), false)
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_warning("Git Bash:"));
        assert!(ui.has_warning("WSL:"));
        assert!(ui.has_message("Recommended shell: none"));
    }

    #[test]
    fn json_output_is_camel_case() {
        let (_temp, coordinator) = coordinator(Platform::Linux);
        let mut ui = MockUI::new();
        StatusCommand::new(&coordinator, skip_everything(), true)
            .execute(&mut ui)
            .unwrap();

        assert!(ui.headers().is_empty());
        let value: serde_json::Value = serde_json::from_str(&ui.data_lines()[0]).unwrap();
        assert_eq!(value["git"]["available"], false);
        assert_eq!(value["envLoaded"], false);
        assert!(value["shell"].is_null());
    }
}
