//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! routed by [`CommandDispatcher`] and share one [`RuntimeCoordinator`](crate::runtime::RuntimeCoordinator).

pub mod dispatcher;
pub mod repo;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
