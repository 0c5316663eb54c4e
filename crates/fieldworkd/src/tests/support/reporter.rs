//! Test double for [`HealthReporter`] that records lifecycle events.

use std::net::SocketAddr;
use std::sync::Mutex;

use camino::Utf8Path;
use fieldwork_config::Config;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;

/// Health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    StoreReady,
    ListenerBound(SocketAddr),
    BootstrapSucceeded,
    BootstrapFailed(String),
}

#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn store_ready(&self, _path: &Utf8Path) {
        self.record(HealthEvent::StoreReady);
    }

    fn listener_bound(&self, addr: SocketAddr) {
        self.record(HealthEvent::ListenerBound(addr));
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }
}
