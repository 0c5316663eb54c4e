//! Field-service ticket dispatch daemon.
//!
//! Technicians' mobile devices connect over TCP, send one `|`-separated
//! command line, and receive one reply. The daemon validates each command,
//! applies it to the technician's own tickets in a SQLite store, and closes
//! the connection. Incident reports may carry up to five photos streamed
//! after the command line.
//!
//! The bootstrap sequence loads layered configuration from
//! [`fieldwork_config`], installs structured telemetry, opens and migrates
//! the store, and binds the listener. Health reporting hooks emit an event at
//! each stage.
//!
//! ## Layers
//!
//! - [`transport`] accepts connections and hands each to its own thread.
//! - `dispatch` parses the control line and routes it through an action
//!   registry built once at startup.
//! - [`lifecycle`] enforces the ticket state machine and ownership.
//! - [`imaging`] reads and writes image frames.
//! - [`store`] owns the schema and pooled connections.

mod bootstrap;
mod dispatch;
mod health;
pub mod imaging;
pub mod lifecycle;
mod operator;
mod process;
pub mod store;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use dispatch::{
    Action, ActionHandler, ActionRegistry, ActionRequest, ActionRouter, Arguments, CommandLine,
    DispatchConnectionHandler, DispatchError, ImageReply, Reply, ResponseToken, parse_timestamp,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use operator::run as run_operator;
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon, run_daemon_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
