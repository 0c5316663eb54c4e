//! Process-level orchestration: bootstrap, serve, and stop on a signal.

mod shutdown;

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::bootstrap::{BootstrapError, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::ListenerError;

pub use self::shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors surfaced while running the daemon process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrap failed before the listener started.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The accept loop could not start or stop cleanly.
    #[error(transparent)]
    Listener(#[from] ListenerError),
    /// Waiting for a shutdown signal failed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}

/// Runs the daemon with the production collaborators until a termination
/// signal arrives.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
pub fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, reporter)?;
    let handle = daemon.spawn()?;
    info!(
        target: PROCESS_TARGET,
        addr = %handle.local_addr(),
        "accepting connections"
    );
    let waited = shutdown.wait();
    handle.shutdown();
    handle.join()?;
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
