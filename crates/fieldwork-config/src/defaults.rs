use camino::Utf8PathBuf;

use crate::endpoint::ListenEndpoint;
use crate::logging::LogFormat;

/// Interface the daemon binds when nothing else is configured.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// TCP port field technicians' devices connect to.
pub const DEFAULT_LISTEN_PORT: u16 = 5000;

/// Relational store file, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "fieldwork.db";

/// Maximum number of pooled store connections.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Per-connection read/write deadline in seconds. Zero disables it.
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 120;

/// Default log filter expression.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default listening endpoint.
#[must_use]
pub fn default_listen_endpoint() -> ListenEndpoint {
    ListenEndpoint::new(DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT)
}

/// Default store location.
#[must_use]
pub fn default_database_path() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_DATABASE_PATH)
}

pub(crate) const fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

pub(crate) const fn default_connection_timeout_secs() -> u64 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value for serde defaults.
pub(crate) fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default log output format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
