//! Connection handler that serves one control line per connection.
//!
//! The handler reads a single bounded control line, routes it, writes the
//! one reply, and returns. The transport closes the socket when the stream is
//! dropped. Read failures and panics inside an action answer `SERVER_ERROR`.

use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::lifecycle::TicketService;
use crate::transport::{ConnectionHandler, ConnectionStream, read_bounded_line};

use super::errors::DispatchError;
use super::response::{Reply, ResponseToken, ResponseWriter};
use super::router::{ActionRegistry, ActionRouter, DISPATCH_TARGET};

/// Maximum size of a control line in bytes. Image payloads follow the line
/// and are bounded separately.
pub(crate) const MAX_CONTROL_LINE_BYTES: usize = 64 * 1024;

/// Connection handler that parses and dispatches control lines.
#[derive(Debug)]
pub struct DispatchConnectionHandler {
    router: ActionRouter,
}

impl DispatchConnectionHandler {
    /// Creates a handler serving every built-in action against `service`.
    pub fn new(service: Arc<dyn TicketService>) -> Self {
        Self::with_registry(ActionRegistry::standard(service))
    }

    /// Creates a handler over a custom registry.
    pub fn with_registry(registry: ActionRegistry) -> Self {
        Self {
            router: ActionRouter::new(registry),
        }
    }

    /// Serves one request from `reader`, answering on `writer`.
    pub(crate) fn serve<R: BufRead, W: Write>(&self, reader: &mut R, writer: &mut W) {
        let line = match read_bounded_line(reader, MAX_CONTROL_LINE_BYTES) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                let error = DispatchError::from(error);
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                Self::answer(writer, &Reply::token(ResponseToken::ServerError));
                return;
            }
        };

        let reply = panic::catch_unwind(AssertUnwindSafe(|| {
            self.router.dispatch(&line, reader)
        }))
        .unwrap_or_else(|_| {
            error!(target: DISPATCH_TARGET, "action handler panicked");
            Reply::token(ResponseToken::ServerError)
        });
        Self::answer(writer, &reply);
    }

    fn answer<W: Write>(writer: &mut W, reply: &Reply) {
        if let Err(error) = ResponseWriter::new(writer).write_reply(reply) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, mut stream: ConnectionStream) {
        let (reader, writer) = stream.split();
        self.serve(reader, writer);
    }
}
