//! Test helpers for the transport module.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use super::{ConnectionHandler, ConnectionStream};

/// Counts connections and records the deadline each one was given.
pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
    deadlines: Mutex<Vec<Option<Duration>>>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
            deadlines: Mutex::new(Vec::new()),
        });
        (count, handler)
    }

    pub(crate) fn deadlines(&self) -> Vec<Option<Duration>> {
        self.deadlines
            .lock()
            .map(|deadlines| deadlines.clone())
            .unwrap_or_default()
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, stream: ConnectionStream) {
        if let (Ok(deadline), Ok(mut deadlines)) = (stream.deadline(), self.deadlines.lock()) {
            deadlines.push(deadline);
        }
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
