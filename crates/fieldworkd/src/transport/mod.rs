//! TCP listener for technician connections.
//!
//! The listener accepts connections on a background thread and hands each
//! one to a [`ConnectionHandler`] on its own thread. A connection carries a
//! single request and is closed once the response is written.

mod errors;
mod handler;
mod lines;
mod listener;
#[cfg(test)]
mod test_utils;

pub use self::errors::{LineError, ListenerError};
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::lines::read_bounded_line;
pub use self::listener::ListenerHandle;
pub(crate) use self::listener::SocketListener;
#[cfg(test)]
pub(crate) use self::test_utils::CountingHandler;

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
