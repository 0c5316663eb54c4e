//! Layered configuration for the fieldwork dispatch daemon.
//!
//! Values are merged from built-in defaults, an optional TOML file, the
//! `FIELDWORK_*` environment variables, and command-line flags, with later
//! layers taking precedence.

mod defaults;
mod endpoint;
mod logging;

use std::ffi::OsString;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::{OrthoConfig, OrthoResult};
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_DATABASE_PATH, DEFAULT_LISTEN_HOST,
    DEFAULT_LISTEN_PORT, DEFAULT_LOG_FILTER, DEFAULT_POOL_SIZE, default_database_path,
    default_listen_endpoint, default_log_filter, default_log_format,
};
pub use endpoint::{EndpointParseError, ListenEndpoint};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::OrthoError;

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "FIELDWORK")]
pub struct Config {
    /// Address the dispatch listener binds.
    #[ortho_config(default = defaults::default_listen_endpoint())]
    pub listen: ListenEndpoint,
    /// SQLite database file backing the store.
    #[ortho_config(default = defaults::default_database_path())]
    pub database_path: Utf8PathBuf,
    /// Upper bound on pooled store connections.
    #[ortho_config(default = defaults::default_pool_size())]
    pub pool_size: u32,
    /// Read/write deadline applied to each accepted connection, in seconds.
    #[ortho_config(default = defaults::default_connection_timeout_secs())]
    pub connection_timeout_secs: u64,
    /// `tracing` filter directive, e.g. `info` or `fieldworkd::dispatch=debug`.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log line format.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: defaults::default_listen_endpoint(),
            database_path: defaults::default_database_path(),
            pool_size: defaults::default_pool_size(),
            connection_timeout_secs: defaults::default_connection_timeout_secs(),
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process arguments, environment, and
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns an error when a layer cannot be read or fails to deserialise.
    pub fn load() -> OrthoResult<Self> {
        <Self as OrthoConfig>::load()
    }

    /// Loads the configuration using `args` in place of the process arguments.
    ///
    /// # Errors
    ///
    /// Returns an error when a layer cannot be read or fails to deserialise.
    pub fn load_from_iter<I, T>(args: I) -> OrthoResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as OrthoConfig>::load_from_iter(args)
    }

    /// Endpoint the listener binds.
    #[must_use]
    pub fn listen(&self) -> &ListenEndpoint {
        &self.listen
    }

    /// Location of the SQLite store.
    #[must_use]
    pub fn database_path(&self) -> &Utf8Path {
        &self.database_path
    }

    /// Connection pool size, never below one.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.pool_size.max(1)
    }

    /// Per-connection I/O deadline, or `None` when disabled.
    #[must_use]
    pub fn connection_timeout(&self) -> Option<Duration> {
        (self.connection_timeout_secs > 0).then(|| Duration::from_secs(self.connection_timeout_secs))
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_constants() {
        let config = Config::default();
        assert_eq!(config.listen().to_string(), "0.0.0.0:5000");
        assert_eq!(config.database_path(), Utf8Path::new(DEFAULT_DATABASE_PATH));
        assert_eq!(config.pool_size(), DEFAULT_POOL_SIZE);
        assert_eq!(
            config.connection_timeout(),
            Some(Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS))
        );
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn bare_invocation_resolves_to_the_defaults() {
        let config = Config::load_from_iter(["fieldworkd"]).expect("load defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_override_only_what_they_name() {
        let config = Config::load_from_iter(["fieldworkd", "--pool-size", "3"]).expect("load");
        assert_eq!(config.pool_size(), 3);
        assert_eq!(config.listen(), &default_listen_endpoint());
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let config = Config {
            connection_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.connection_timeout(), None);
    }

    #[test]
    fn pool_size_is_at_least_one() {
        let config = Config {
            pool_size: 0,
            ..Config::default()
        };
        assert_eq!(config.pool_size(), 1);
    }
}
