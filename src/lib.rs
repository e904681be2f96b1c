//! envprobe - Runtime environment discovery for desktop applications.
//!
//! envprobe finds the external tools an application depends on (Node.js,
//! Bun, Git, and on Windows Git Bash and WSL), reports where they live and
//! which version they are, and caches the result for the whole process.
//! Missing tools are data, not errors.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Timeouts and search locations
//! - [`detect`] - Per-tool detectors and status records
//! - [`error`] - Error types and result aliases
//! - [`platform`] - OS, CPU, and bundled-runtime targets
//! - [`probe`] - Process execution, PATH lookup, and shell environment import
//! - [`runtime`] - Initialization, the cached status, and boundary operations
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```no_run
//! use envprobe::config::RuntimeConfig;
//! use envprobe::runtime::{RuntimeCoordinator, RuntimeInitOptions};
//!
//! let coordinator = RuntimeCoordinator::new(RuntimeConfig::default());
//! let status = coordinator.initialize_runtime(&RuntimeInitOptions::default()).unwrap();
//! for line in status.summary() {
//!     println!("{}: {}", line.label, line.detail);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod platform;
pub mod probe;
pub mod runtime;
pub mod ui;

pub use error::{ProbeError, Result};
pub use runtime::{GitRepoStatus, RuntimeCoordinator, RuntimeInitOptions, RuntimeStatus};
