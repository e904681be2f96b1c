//! Runtime initialization and status.
//!
//! [`RuntimeCoordinator`] runs the detectors and owns the cached
//! [`RuntimeStatus`]. Applications usually talk to the process-wide
//! instance through [`global`] or the [`boundary`] functions; tests build
//! their own coordinators.

pub mod boundary;
pub mod coordinator;
pub mod options;
pub mod repo;
pub mod status;

pub use coordinator::RuntimeCoordinator;
pub use options::RuntimeInitOptions;
pub use repo::GitRepoStatus;
pub use status::{RuntimeStatus, SummaryLine};

use crate::config::RuntimeConfig;
use std::sync::OnceLock;

static GLOBAL: OnceLock<RuntimeCoordinator> = OnceLock::new();

/// The process-wide coordinator.
///
/// Created on first use from the layered [`RuntimeConfig`] unless
/// [`install_global`] ran first.
pub fn global() -> &'static RuntimeCoordinator {
    GLOBAL.get_or_init(|| {
        let config = RuntimeConfig::load(None).unwrap_or_else(|e| {
            tracing::warn!("Using default runtime config: {}", e);
            RuntimeConfig::default()
        });
        RuntimeCoordinator::new(config)
    })
}

/// Install the process-wide coordinator.
///
/// Fails, handing the coordinator back, if one already exists.
pub fn install_global(coordinator: RuntimeCoordinator) -> Result<&'static RuntimeCoordinator, RuntimeCoordinator> {
    GLOBAL.set(coordinator)?;
    Ok(global())
}
