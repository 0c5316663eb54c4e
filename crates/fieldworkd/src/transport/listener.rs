//! Accept loop for the dispatch listener.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use fieldwork_config::ListenEndpoint;
use tracing::{debug, info, warn};

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Listener bound to a TCP endpoint but not yet accepting.
#[derive(Debug)]
pub(crate) struct SocketListener {
    listener: TcpListener,
    local_addr: SocketAddr,
    connection_timeout: Option<Duration>,
}

impl SocketListener {
    pub(crate) fn bind(endpoint: &ListenEndpoint) -> Result<Self, ListenerError> {
        let listener = bind_tcp(endpoint.host(), endpoint.port())?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;
        Ok(Self {
            listener,
            local_addr,
            connection_timeout: None,
        })
    }

    /// Sets the read/write deadline applied to every accepted connection.
    pub(crate) fn with_connection_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Address actually bound, with any ephemeral port resolved.
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub(crate) fn start(
        self,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let local_addr = self.local_addr;
        let handle = thread::Builder::new()
            .name("fieldwork-accept".to_owned())
            .spawn(move || run_accept_loop(&self, &shutdown_flag, &handler))
            .map_err(|source| ListenerError::Spawn { source })?;
        Ok(ListenerHandle {
            local_addr,
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background accept thread.
///
/// Dropping the handle requests shutdown; [`ListenerHandle::join`] waits for
/// the accept loop to exit. Connections already being served finish on their
/// own threads.
#[derive(Debug)]
pub struct ListenerHandle {
    local_addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Asks the accept loop to stop.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the accept loop to stop.
    pub fn join(mut self) -> Result<(), ListenerError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| ListenerError::ThreadPanic),
            None => Ok(()),
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    shutdown: &AtomicBool,
    handler: &Arc<dyn ConnectionHandler>,
) {
    info!(
        target: LISTENER_TARGET,
        addr = %listener.local_addr,
        "dispatch listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match listener.listener.accept() {
            Ok((stream, peer)) => {
                last_error = None;
                serve(listener, stream, peer, handler);
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    info!(target: LISTENER_TARGET, addr = %listener.local_addr, "dispatch listener stopped");
}

fn serve(
    listener: &SocketListener,
    stream: TcpStream,
    peer: SocketAddr,
    handler: &Arc<dyn ConnectionHandler>,
) {
    let connection = match prepare(stream, listener.connection_timeout) {
        Ok(connection) => connection,
        Err(error) => {
            warn!(
                target: LISTENER_TARGET,
                peer = %peer,
                error = %error,
                "failed to prepare connection"
            );
            return;
        }
    };
    debug!(target: LISTENER_TARGET, peer = %peer, "connection accepted");
    let handler = Arc::clone(handler);
    let spawned = thread::Builder::new()
        .name("fieldwork-conn".to_owned())
        .spawn(move || handler.handle(connection));
    if let Err(error) = spawned {
        warn!(
            target: LISTENER_TARGET,
            peer = %peer,
            error = %error,
            "failed to spawn connection thread"
        );
    }
}

fn prepare(stream: TcpStream, timeout: Option<Duration>) -> io::Result<ConnectionStream> {
    stream.set_nonblocking(false)?;
    let connection = ConnectionStream::tcp(stream)?;
    connection.set_deadline(timeout)?;
    Ok(connection)
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::Bind { addr, source })
}
