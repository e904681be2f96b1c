//! Shell environment recommendation for Windows.

use super::{ShellEnvironment, ShellEnvironmentStatus, ToolStatus, WslStatus};

/// Combine Git Bash and WSL results into one recommendation.
///
/// Git Bash wins when available; otherwise any available WSL (version 1 or
/// 2 alike); otherwise nothing.
pub fn resolve_shell_environment(git_bash: ToolStatus, wsl: WslStatus) -> ShellEnvironmentStatus {
    let recommended = if git_bash.available {
        Some(ShellEnvironment::GitBash)
    } else if wsl.available {
        Some(ShellEnvironment::Wsl)
    } else {
        None
    };

    ShellEnvironmentStatus {
        git_bash,
        wsl,
        recommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn git_bash(available: bool) -> ToolStatus {
        if available {
            ToolStatus::found(PathBuf::from(r"C:\Program Files\Git\bin\bash.exe"), Some("5.2.26".into()))
        } else {
            ToolStatus::unavailable("Git Bash not found")
        }
    }

    fn wsl(available: bool, version: Option<&str>) -> WslStatus {
        if available {
            WslStatus::found(
                PathBuf::from("wsl.exe"),
                vec!["Ubuntu".into()],
                Some("Ubuntu".into()),
                version.map(String::from),
            )
        } else {
            WslStatus::unavailable("WSL is not installed")
        }
    }

    #[test]
    fn git_bash_preferred_over_wsl() {
        let status = resolve_shell_environment(git_bash(true), wsl(true, Some("2")));
        assert_eq!(status.recommended, Some(ShellEnvironment::GitBash));
    }

    #[test]
    fn wsl_used_without_git_bash() {
        let status = resolve_shell_environment(git_bash(false), wsl(true, Some("2")));
        assert_eq!(status.recommended, Some(ShellEnvironment::Wsl));
    }

    #[test]
    fn wsl_version_does_not_matter() {
        for version in [Some("1"), Some("2"), None] {
            let status = resolve_shell_environment(git_bash(false), wsl(true, version));
            assert_eq!(status.recommended, Some(ShellEnvironment::Wsl));
        }
    }

    #[test]
    fn nothing_available_recommends_nothing() {
        let status = resolve_shell_environment(git_bash(false), wsl(false, None));
        assert_eq!(status.recommended, None);
        assert!(!status.git_bash.available);
        assert!(!status.wsl.available);
    }

    #[test]
    fn git_bash_alone_is_recommended() {
        let status = resolve_shell_environment(git_bash(true), wsl(false, None));
        assert_eq!(status.recommended, Some(ShellEnvironment::GitBash));
    }
}
