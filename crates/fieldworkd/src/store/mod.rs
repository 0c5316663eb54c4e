//! Relational store: schema, pooled SQLite connections, and the queries the
//! lifecycle engine composes into transactions.
//!
//! Every mutation that must be atomic runs inside a single
//! `immediate_transaction`, so a failure at any step rolls the whole unit back.

mod admin;
pub(crate) mod audit;
pub(crate) mod clients;
mod errors;
pub(crate) mod images;
pub(crate) mod positions;
pub(crate) mod records;
pub(crate) mod schema;
mod status;
pub(crate) mod technicians;
pub(crate) mod tickets;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use diesel::Connection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

pub use admin::{Administration, NewClient};
pub use errors::StoreError;
pub use records::{AuditRow, ClientRow, ImageSummaryRow, PositionRow, TechnicianRow, TicketRow};
pub use status::TicketStatus;
pub use tickets::TicketSelector;

/// Tracing target for store events.
pub(crate) const STORE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::store");

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);
const BUSY_TIMEOUT_MS: u32 = 5_000;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Connection checked out of the pool.
pub type StoreConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Shared pool of SQLite connections with the schema migrated.
///
/// Cloning is cheap; all clones draw from the same pool.
#[derive(Debug, Clone)]
pub struct StorePool {
    pool: SqlitePool,
    path: Utf8PathBuf,
}

impl StorePool {
    /// Opens (creating if needed) the database at `path` and applies any
    /// pending migrations.
    pub fn open(path: &Utf8Path, max_size: u32) -> Result<Self, StoreError> {
        // Fail fast on an unreachable path.
        SqliteConnection::establish(path.as_str()).map_err(|source| StoreError::Connect {
            path: path.to_path_buf(),
            source,
        })?;
        let manager = ConnectionManager::<SqliteConnection>::new(path.as_str());
        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .connection_timeout(CHECKOUT_TIMEOUT)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)
            .map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self {
            pool,
            path: path.to_path_buf(),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Location of the backing database file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Checks a connection out of the pool.
    pub fn connection(&self) -> Result<StoreConnection, StoreError> {
        self.pool.get().map_err(StoreError::Checkout)
    }

    fn migrate(&self) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| StoreError::Migration {
                message: error.to_string(),
            })?;
        info!(
            target: STORE_TARGET,
            path = %self.path,
            applied = applied.len(),
            "store schema ready"
        );
        Ok(())
    }
}

/// Per-connection settings SQLite does not persist in the database file.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}
