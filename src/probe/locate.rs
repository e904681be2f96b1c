//! Executable lookup on PATH and at well-known install locations.
//!
//! Lookup walks PATH entries directly instead of shelling out to `which` or
//! `where`, whose behavior varies across systems and which would cost an
//! extra process per tool.

use crate::platform::Platform;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extensions tried for bare names on Windows, in PATHEXT priority order.
const WINDOWS_EXTENSIONS: &[&str] = &["exe", "cmd", "bat"];

/// Package-manager and system bin directories outside a GUI app's PATH.
const UNIX_SYSTEM_DIRS: &[&str] = &[
    "/opt/homebrew/bin",
    "/usr/local/bin",
    "/usr/bin",
    "/Library/Developer/CommandLineTools/usr/bin",
];

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Split a PATH-style value into directories.
pub fn split_path(value: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value)
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

/// Parse the current process PATH into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| split_path(&path))
        .unwrap_or_default()
}

/// Fixed system bin directories searched after PATH on this host.
pub fn default_system_dirs() -> Vec<PathBuf> {
    if cfg!(windows) {
        return Vec::new();
    }
    UNIX_SYSTEM_DIRS.iter().map(PathBuf::from).collect()
}

/// Candidate file names for a tool on the given platform.
///
/// `node` becomes `node.exe`, `node.cmd`, `node.bat` on Windows; names that
/// already carry an extension are left alone.
pub fn candidate_names(tool: &str, platform: Platform) -> Vec<String> {
    if !platform.is_windows() || Path::new(tool).extension().is_some() {
        return vec![tool.to_string()];
    }
    WINDOWS_EXTENSIONS
        .iter()
        .map(|ext| format!("{}.{}", tool, ext))
        .collect()
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf], platform: Platform) -> Option<PathBuf> {
    let names = candidate_names(tool, platform);
    for dir in path_entries {
        for name in &names {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Return the first path in `candidates` that is an executable file.
pub fn first_executable<'a, I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    candidates.into_iter().find(|p| is_executable(p)).cloned()
}

/// Resolve a tool on PATH, then fall back to well-known locations.
///
/// Returns the resolved path and the number of locations searched.
pub fn locate_tool(
    tool: &str,
    path_entries: &[PathBuf],
    well_known: &[PathBuf],
    platform: Platform,
) -> (Option<PathBuf>, usize) {
    if let Some(found) = resolve_tool_path(tool, path_entries, platform) {
        tracing::debug!("{}: found on PATH at {}", tool, found.display());
        return (Some(found), path_entries.len());
    }
    let found = first_executable(well_known);
    if let Some(path) = &found {
        tracing::debug!("{}: found at well-known location {}", tool, path.display());
    }
    (found, path_entries.len() + well_known.len())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    /// Create a fake binary at a path (creates parent dirs as needed).
    pub fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::create_fake_binary;
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a non-executable file at a path.
    #[cfg(unix)]
    fn create_non_executable_file(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "not executable").unwrap();
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("node"));
        create_fake_binary(&dir_b.join("node"));

        let result = resolve_tool_path("node", &[dir_a.clone(), dir_b], Platform::Linux);
        assert_eq!(result, Some(dir_a.join("node")));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("empty");
        fs::create_dir_all(&dir).unwrap();

        assert!(resolve_tool_path("node", &[dir], Platform::Linux).is_none());
    }

    #[test]
    fn resolve_tool_path_skips_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("git")).unwrap();

        assert!(resolve_tool_path("git", &[temp.path().to_path_buf()], Platform::Linux).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_non_executable_file(&dir_a.join("bun"));
        create_fake_binary(&dir_b.join("bun"));

        let result = resolve_tool_path("bun", &[dir_a, dir_b.clone()], Platform::Linux);
        assert_eq!(result, Some(dir_b.join("bun")));
    }

    #[test]
    fn windows_candidates_add_extensions() {
        assert_eq!(
            candidate_names("node", Platform::Windows),
            vec!["node.exe", "node.cmd", "node.bat"]
        );
        assert_eq!(candidate_names("bash.exe", Platform::Windows), vec!["bash.exe"]);
        assert_eq!(candidate_names("node", Platform::MacOS), vec!["node"]);
    }

    #[test]
    fn resolve_tool_path_finds_windows_extension() {
        let temp = TempDir::new().unwrap();
        create_fake_binary(&temp.path().join("git.exe"));

        let result = resolve_tool_path("git", &[temp.path().to_path_buf()], Platform::Windows);
        assert_eq!(result, Some(temp.path().join("git.exe")));
    }

    #[test]
    fn locate_tool_falls_back_to_well_known() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        let known = temp.path().join("opt/node/bin/node");
        create_fake_binary(&known);

        let (found, searched) = locate_tool(
            "node",
            std::slice::from_ref(&empty),
            &[temp.path().join("missing/node"), known.clone()],
            Platform::Linux,
        );
        assert_eq!(found, Some(known));
        assert_eq!(searched, 3);
    }

    #[test]
    fn split_path_drops_empty_entries() {
        let joined = std::env::join_paths(["/usr/bin", "/bin"]).unwrap();
        let parts = split_path(&joined);
        assert_eq!(parts, vec![PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
    }

    #[cfg(unix)]
    #[test]
    fn default_system_dirs_cover_package_managers() {
        let dirs = default_system_dirs();
        assert!(dirs.contains(&PathBuf::from("/opt/homebrew/bin")));
        assert!(dirs.contains(&PathBuf::from("/usr/bin")));
    }

    #[test]
    fn is_executable_returns_false_for_nonexistent_file() {
        assert!(!is_executable(Path::new("/nonexistent/path/to/file")));
    }
}
