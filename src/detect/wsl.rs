//! Windows Subsystem for Linux detection.
//!
//! Runs `wsl.exe -l -v` and parses its table:
//!
//! ```text
//!   NAME            STATE           VERSION
//! * Ubuntu          Running         2
//!   Debian          Stopped         1
//! ```
//!
//! The `*` marks the default distribution. Only the default row's VERSION
//! column is reported; other rows contribute their names only. `wsl.exe`
//! writes UTF-16 unless told otherwise, and header text is localized, so
//! the parser keys on tokens rather than fixed rows or columns.

use super::{DetectContext, DetectionFailure, WslStatus};
use crate::probe::command::ProbeRequest;
use crate::probe::locate::is_executable;
use std::path::PathBuf;

/// Display name used in status messages.
pub const TOOL: &str = "WSL";

/// Column header words dropped before parsing rows.
const HEADER_TOKENS: &[&str] = &["name", "state", "version"];

/// Marker prefixed to the default distribution's row.
const DEFAULT_MARKER: char = '*';

/// Parsed `wsl -l -v` table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WslListing {
    /// Distribution names in listing order.
    pub distros: Vec<String>,
    /// The row marked with `*`.
    pub default_distro: Option<String>,
    /// WSL version of the default distribution, if it is 1 or 2.
    pub version: Option<String>,
}

/// How a failed listing should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WslFailureKind {
    /// `wsl.exe` itself is missing.
    NotInstalled,
    /// WSL is present but has no distributions.
    NoDistribution,
    /// Anything else.
    Other,
}

/// Detect WSL. Off Windows this returns immediately without running anything.
pub fn detect(ctx: &DetectContext<'_>) -> WslStatus {
    if !ctx.platform.is_windows() {
        return WslStatus::unavailable(DetectionFailure::PlatformMismatch);
    }

    let wsl = wsl_executable(ctx);
    let request = ProbeRequest::new(&wsl)
        .args(["-l", "-v"])
        .force_utf8(true)
        .timeout(ctx.config.wsl_timeout());

    let output = match ctx.runner().run(&request) {
        Ok(output) => output,
        Err(e) => return failure_status(&e.to_string()),
    };

    if !output.success() {
        let detail = output.combined();
        let message = match output.exit_code {
            Some(code) => format!("exited with code {}: {}", code, detail),
            None => format!("terminated by signal: {}", detail),
        };
        return failure_status(&message);
    }

    if classify_wsl_failure(&output.stdout) == WslFailureKind::NoDistribution {
        return no_distribution();
    }

    let listing = parse_wsl_list(&output.stdout);
    if listing.distros.is_empty() {
        return no_distribution();
    }

    tracing::debug!(
        "{}: {} distro(s), default={:?}, version={:?}",
        TOOL,
        listing.distros.len(),
        listing.default_distro,
        listing.version
    );
    WslStatus::found(wsl, listing.distros, listing.default_distro, listing.version)
}

fn no_distribution() -> WslStatus {
    WslStatus::unavailable("WSL is installed but no distribution is configured")
}

fn failure_status(message: &str) -> WslStatus {
    match classify_wsl_failure(message) {
        WslFailureKind::NotInstalled => WslStatus::unavailable("WSL is not installed"),
        WslFailureKind::NoDistribution => no_distribution(),
        WslFailureKind::Other => WslStatus::unavailable(format!("WSL detection failed: {}", message)),
    }
}

/// `%SystemRoot%\System32\wsl.exe` when present, else `wsl.exe` via PATH.
pub fn wsl_executable(ctx: &DetectContext<'_>) -> PathBuf {
    ctx.var_path("SystemRoot", r"System32\wsl.exe")
        .filter(|p| is_executable(p))
        .unwrap_or_else(|| PathBuf::from("wsl.exe"))
}

/// Classify failure text from running `wsl.exe`.
///
/// Substring matching on tool output is brittle across Windows builds and
/// UI languages; anything unrecognized is [`WslFailureKind::Other`].
pub fn classify_wsl_failure(message: &str) -> WslFailureKind {
    let lower = message.to_lowercase();

    if lower.contains("no installed distributions") || lower.contains("has no installed distribution") {
        return WslFailureKind::NoDistribution;
    }

    const MISSING: &[&str] = &[
        "is not recognized as an internal or external command",
        "cannot find the file",
        "no such file or directory",
        "program not found",
        "enoent",
        "optional component is not enabled",
    ];
    if MISSING.iter().any(|needle| lower.contains(needle)) {
        return WslFailureKind::NotInstalled;
    }

    WslFailureKind::Other
}

/// Parse `wsl -l -v` output. Never fails; unrecognized lines are skipped.
pub fn parse_wsl_list(output: &str) -> WslListing {
    let mut listing = WslListing::default();

    for raw in output.lines() {
        let line = raw.replace('\0', "");
        let line = line.trim();
        if line.is_empty() || is_header(line) {
            continue;
        }

        let (is_default, row) = match line.strip_prefix(DEFAULT_MARKER) {
            Some(rest) => (true, rest.trim_start()),
            None => (false, line),
        };

        let tokens: Vec<&str> = row.split_whitespace().collect();
        let Some(name) = tokens.first() else {
            continue;
        };
        listing.distros.push(name.to_string());

        if is_default {
            listing.default_distro = Some(name.to_string());
            listing.version = tokens
                .last()
                .filter(|_| tokens.len() > 1)
                .filter(|marker| matches!(**marker, "1" | "2"))
                .map(|marker| marker.to_string());
        }
    }

    listing
}

fn is_header(line: &str) -> bool {
    line.split_whitespace()
        .any(|token| HEADER_TOKENS.iter().any(|h| token.eq_ignore_ascii_case(h)))
}
