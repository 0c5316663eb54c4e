//! Daemon bootstrap orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use fieldwork_config::Config;
use ortho_config::OrthoError;
use thiserror::Error;

use crate::dispatch::DispatchConnectionHandler;
use crate::health::HealthReporter;
use crate::lifecycle::TicketEngine;
use crate::store::{StoreError, StorePool};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that returns a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The store could not be opened or migrated.
    #[error("failed to open store: {source}")]
    Store {
        /// Underlying store error.
        #[source]
        source: StoreError,
    },
    /// The listener could not bind its endpoint.
    #[error("failed to bind listener: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
}

/// A bootstrapped daemon: store open, listener bound, not yet accepting.
pub struct Daemon {
    config: Config,
    listener: SocketListener,
    handler: Arc<DispatchConnectionHandler>,
    telemetry: TelemetryHandle,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Starts accepting connections on a background thread.
    pub fn spawn(self) -> Result<ListenerHandle, ListenerError> {
        self.listener.start(self.handler)
    }
}

/// Bootstraps the daemon using the supplied collaborators.
pub fn bootstrap_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
) -> Result<Daemon, BootstrapError> {
    reporter.bootstrap_starting();
    let result = assemble(loader, reporter.as_ref());
    match &result {
        Ok(daemon) => reporter.bootstrap_succeeded(daemon.config()),
        Err(error) => reporter.bootstrap_failed(error),
    }
    result
}

fn assemble(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
) -> Result<Daemon, BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;

    let pool = StorePool::open(config.database_path(), config.pool_size())
        .map_err(|source| BootstrapError::Store { source })?;
    reporter.store_ready(pool.path());

    let handler = Arc::new(DispatchConnectionHandler::new(Arc::new(TicketEngine::new(
        pool,
    ))));
    let listener = SocketListener::bind(config.listen())
        .map_err(|source| BootstrapError::Listener { source })?
        .with_connection_timeout(config.connection_timeout());
    reporter.listener_bound(listener.local_addr());

    Ok(Daemon {
        config,
        listener,
        handler,
        telemetry,
    })
}
