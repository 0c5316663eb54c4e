//! Shared harness pieces for the behaviour suites.

mod client;
mod reporter;

pub use self::client::{Response, TechnicianClient};
pub use self::reporter::{HealthEvent, RecordingHealthReporter};
