//! Connection abstractions shared by the listener and request handlers.

use std::io::{self, BufReader};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use tracing::debug;

use super::LISTENER_TARGET;

/// An accepted technician connection.
///
/// Reads go through a buffer so that binary image payloads following the
/// control line are not lost. The socket is shut down when the stream is
/// dropped, whichever path the handler took.
pub(crate) struct ConnectionStream {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl ConnectionStream {
    pub(crate) fn tcp(stream: TcpStream) -> io::Result<Self> {
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
        })
    }

    /// Applies the same read and write deadline to the socket.
    pub(crate) fn set_deadline(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.writer.set_read_timeout(timeout)?;
        self.writer.set_write_timeout(timeout)
    }

    #[cfg(test)]
    pub(crate) fn deadline(&self) -> io::Result<Option<Duration>> {
        self.writer.read_timeout()
    }

    /// Splits the connection into its buffered reader and its writer.
    pub(crate) fn split(&mut self) -> (&mut BufReader<TcpStream>, &mut TcpStream) {
        (&mut self.reader, &mut self.writer)
    }

    fn close(&self) {
        if let Err(error) = self.writer.shutdown(Shutdown::Both)
            && error.kind() != io::ErrorKind::NotConnected
        {
            debug!(
                target: LISTENER_TARGET,
                error = %error,
                "failed to shut down connection"
            );
        }
    }
}

impl Drop for ConnectionStream {
    fn drop(&mut self) {
        self.close();
    }
}

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}
