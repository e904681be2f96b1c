//! Single-command process probe.
//!
//! Every external tool invocation made during detection goes through
//! [`run`] (or a [`CommandRunner`] standing in for it). The probe enforces a
//! hard timeout and decodes output as UTF-8 regardless of the console code
//! page, so detectors only ever see a decoded [`ProbeOutput`] or a
//! [`ProbeError`].

use crate::error::{ProbeError, Result};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for a version query.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Interval between exit polls while waiting on a child.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Windows process creation flag that suppresses the console window.
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Program name or absolute path.
    pub program: PathBuf,
    /// Arguments passed to the program.
    pub args: Vec<String>,
    /// Hard limit on wall-clock time.
    pub timeout: Duration,
    /// Route through a UTF-8 code page on Windows.
    pub force_utf8: bool,
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl ProbeRequest {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            force_utf8: false,
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn force_utf8(mut self, force: bool) -> Self {
        self.force_utf8 = force;
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Human-readable command line, used in logs and error messages.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Bare file name of the program (`git` for `/usr/bin/git`).
    pub fn program_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Decoded result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    /// Standard output, decoded.
    pub stdout: String,
    /// Standard error, decoded.
    pub stderr: String,
}

impl ProbeOutput {
    /// Create a successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Stdout followed by stderr, trimmed. Useful for error text.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{}\n{}", stdout, stderr),
        }
    }
}

/// Something that can execute a [`ProbeRequest`].
///
/// Detectors depend on this trait so tests can script tool responses
/// without spawning processes.
pub trait CommandRunner: Send + Sync {
    fn run(&self, request: &ProbeRequest) -> Result<ProbeOutput>;
}

/// Runner that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, request: &ProbeRequest) -> Result<ProbeOutput> {
        run(request)
    }
}

/// Run a command with a hard timeout and locale-safe decoding.
///
/// The timeout covers both the child's exit and draining its output. On
/// timeout the child is killed and its output discarded; the reader threads
/// are detached because grandchildren may keep the pipes open.
pub fn run(request: &ProbeRequest) -> Result<ProbeOutput> {
    let command_line = request.display();
    tracing::debug!("probe: {} (timeout {:?})", command_line, request.timeout);

    let mut cmd = build_command(request);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    if let Some(cwd) = &request.cwd {
        cmd.current_dir(cwd);
    }

    let start = Instant::now();
    let mut child = cmd.spawn().map_err(|e| ProbeError::Spawn {
        command: command_line.clone(),
        message: e.to_string(),
    })?;

    let stdout_rx = spawn_reader(child.stdout.take());
    let stderr_rx = spawn_reader(child.stderr.take());

    let status = wait_with_timeout(&mut child, request.timeout, start).map_err(|e| {
        ProbeError::Spawn {
            command: command_line.clone(),
            message: e.to_string(),
        }
    })?;

    let timed_out = || ProbeError::TimedOut {
        command: command_line.clone(),
        timeout_ms: request.timeout.as_millis() as u64,
    };

    let Some(status) = status else {
        let _ = child.kill();
        let _ = child.wait();
        tracing::debug!("probe: {} timed out", command_line);
        return Err(timed_out());
    };

    // A background grandchild can hold the pipes open after the child exits.
    let deadline = start + request.timeout;
    let (Some(stdout), Some(stderr)) = (
        collect_output(&stdout_rx, deadline),
        collect_output(&stderr_rx, deadline),
    ) else {
        tracing::debug!("probe: {} output still open at deadline", command_line);
        return Err(timed_out());
    };

    let output = ProbeOutput {
        exit_code: status.code(),
        stdout: decode_output(&stdout),
        stderr: decode_output(&stderr),
    };
    tracing::debug!(
        "probe: {} exited with {:?} in {:?}",
        command_line,
        output.exit_code,
        start.elapsed()
    );
    Ok(output)
}

#[cfg(windows)]
fn build_command(request: &ProbeRequest) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = if request.force_utf8 {
        // chcp only affects the console the child inherits, so the
        // code-page switch and the tool must share one cmd.exe.
        let mut line = format!("chcp 65001 >nul && \"{}\"", request.program.display());
        for arg in &request.args {
            line.push(' ');
            line.push_str(arg);
        }
        let mut cmd = Command::new("cmd");
        cmd.args(["/D", "/S", "/C"]);
        cmd.raw_arg(format!("\"{}\"", line));
        cmd.env("WSL_UTF8", "1");
        cmd
    } else {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args);
        cmd
    };
    cmd.creation_flags(CREATE_NO_WINDOW);
    cmd
}

#[cfg(not(windows))]
fn build_command(request: &ProbeRequest) -> Command {
    let mut cmd = Command::new(&request.program);
    cmd.args(&request.args);
    cmd
}

fn spawn_reader<R>(source: Option<R>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut source) = source {
            let _ = source.read_to_end(&mut buffer);
        }
        let _ = tx.send(buffer);
    });
    rx
}

/// Wait for a reader to reach EOF, giving up at the deadline.
///
/// Returns `None` if the stream is still open when the deadline passes.
fn collect_output(rx: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(remaining) {
        Ok(buffer) => Some(buffer),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Vec::new()),
    }
}

/// Poll the child until it exits or the deadline passes.
///
/// Returns `Ok(None)` on timeout.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
    start: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Decode raw process output to a `String`.
///
/// Handles UTF-16LE (with or without BOM, as `wsl.exe` emits by default),
/// strips a UTF-8 BOM, and falls back to lossy UTF-8.
pub fn decode_output(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(b"\xFF\xFE") {
        return decode_utf16le(rest);
    }
    if looks_like_utf16le(bytes) {
        return decode_utf16le(bytes);
    }
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Heuristic: mostly-ASCII UTF-16LE text has a NUL in nearly every odd byte.
fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.len() < 4 || bytes.len() % 2 != 0 {
        return false;
    }
    let pairs = bytes.len() / 2;
    let odd_nuls = bytes.iter().skip(1).step_by(2).filter(|b| **b == 0).count();
    odd_nuls * 4 >= pairs * 3
}

fn decode_utf16le(bytes: &[u8]) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}
