//! Structured health reporting for daemon lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use camino::Utf8Path;
use fieldwork_config::Config;

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked once the store is open and its schema is current.
    fn store_ready(&self, path: &Utf8Path);

    /// Invoked once the listener holds its port.
    fn listener_bound(&self, addr: SocketAddr);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn store_ready(&self, path: &Utf8Path) {
        (**self).store_ready(path);
    }

    fn listener_bound(&self, addr: SocketAddr) {
        (**self).listener_bound(addr);
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn store_ready(&self, path: &Utf8Path) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "store_ready",
            database = %path,
            "store ready"
        );
    }

    fn listener_bound(&self, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "listener_bound",
            %addr,
            "listener bound"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            pool_size = config.pool_size(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }
}
