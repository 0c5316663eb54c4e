use camino::Utf8PathBuf;
use diesel::r2d2::PoolError;
use thiserror::Error;

/// Errors raised by the relational store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The connection pool could not be created.
    #[error("failed to open store at '{path}': {source}")]
    Open {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying pool error.
        #[source]
        source: PoolError,
    },
    /// The database file could not be opened or created.
    #[error("failed to connect to store at '{path}': {source}")]
    Connect {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying connection error.
        #[source]
        source: diesel::ConnectionError,
    },
    /// No pooled connection became available.
    #[error("failed to check out a store connection: {0}")]
    Checkout(#[source] PoolError),
    /// Embedded schema migrations failed to apply.
    #[error("failed to apply schema migrations: {message}")]
    Migration {
        /// Migration harness message.
        message: String,
    },
    /// A query or statement failed.
    #[error("store query failed: {0}")]
    Query(#[from] diesel::result::Error),
    /// Hashing or verifying a credential failed.
    #[error("credential check failed: {0}")]
    Credential(#[from] bcrypt::BcryptError),
    /// A persisted ticket carries a status outside the known set.
    #[error("ticket {ticket_id} has unrecognised status '{status}'")]
    UnknownStatus {
        /// Ticket surrogate key.
        ticket_id: i32,
        /// Stored status text.
        status: String,
    },
}
