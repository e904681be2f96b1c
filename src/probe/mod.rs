//! External process primitives.
//!
//! - [`command`] - Run a program with a timeout and decode its output
//! - [`locate`] - PATH parsing and executable lookup
//! - [`env_loader`] - Import the login shell's environment

pub mod command;
pub mod env_loader;
pub mod locate;

pub use command::{CommandRunner, ProbeOutput, ProbeRequest, SystemRunner};
pub use env_loader::{EnvLoadResult, ShellEnvLoader};
