//! Ticket lifecycle: the state machine and the transactional operations a
//! technician may perform on their own tickets.
//!
//! Every operation resolves the technician by login first and only ever
//! touches tickets that technician owns. Transitions are applied with a
//! conditional update guarded by owner and current status, so a concurrent
//! change between check and write cannot slip through.

mod engine;
mod errors;
mod reason;
mod records;

pub use engine::TicketEngine;
pub use errors::LifecycleError;
pub use reason::IncidentReason;
pub use records::{
    ImageRecord, ImageSummary, IncidentReport, StartTicket, StoredImage, TicketDetail,
    TicketSummary,
};
pub use crate::store::TicketStatus;

use crate::imaging::IncomingImage;

#[cfg(test)]
pub(crate) use records::fixtures;

/// Tracing target for lifecycle events.
pub(crate) const LIFECYCLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lifecycle");

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new pending ticket was created.
    Created { ticket_id: i32 },
    /// The technician already has this ticket and it is still open.
    AlreadyExists,
    /// The technician already closed this ticket.
    AlreadyTerminated,
}

/// Result of a soft-delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The ticket is now deleted.
    Deleted,
    /// Terminated tickets are kept.
    Terminated,
    /// Not found, not owned, or in a status that cannot be deleted.
    Rejected,
}

/// Operations the dispatcher performs on behalf of technicians.
///
/// `Ok(false)` means the request was well formed but the ticket was not
/// found, not owned, or not in an eligible status.
#[cfg_attr(test, mockall::automock)]
pub trait TicketService: Send + Sync {
    /// Checks a login and plaintext credential.
    fn login(&self, login: &str, credential: &str) -> Result<bool, LifecycleError>;

    /// Creates a pending ticket and records the technician's position.
    fn start(&self, login: &str, request: &StartTicket) -> Result<StartOutcome, LifecycleError>;

    /// Closes an open ticket identified by its number.
    fn finish(
        &self,
        login: &str,
        ticket_number: i32,
        closed_at: chrono::NaiveDateTime,
    ) -> Result<bool, LifecycleError>;

    /// Cancels an open ticket identified by its number, recording why.
    fn report_incident(
        &self,
        login: &str,
        ticket_number: i32,
        report: &IncidentReport,
    ) -> Result<bool, LifecycleError>;

    /// Cancels a ticket, stores its evidence images, and writes an audit
    /// entry, all or nothing.
    fn report_incident_with_images(
        &self,
        login: &str,
        ticket_number: i32,
        report: &IncidentReport,
        images: &[IncomingImage],
    ) -> Result<bool, LifecycleError>;

    /// Rewrites the reason and description of a non-terminal ticket.
    fn edit(&self, login: &str, ticket_id: i32, report: &IncidentReport)
    -> Result<bool, LifecycleError>;

    /// Soft-deletes a pending or cancelled ticket.
    fn delete(&self, login: &str, ticket_id: i32) -> Result<DeleteOutcome, LifecycleError>;

    /// Returns a cancelled ticket to pending.
    fn resume(&self, login: &str, ticket_id: i32) -> Result<bool, LifecycleError>;

    /// All of the technician's tickets, newest first.
    fn history(&self, login: &str) -> Result<Vec<TicketSummary>, LifecycleError>;

    /// One owned ticket with its image metadata.
    fn detail(&self, login: &str, ticket_id: i32) -> Result<Option<TicketDetail>, LifecycleError>;

    /// One image, with bytes, from an owned ticket.
    fn image(&self, login: &str, image_id: i32) -> Result<Option<StoredImage>, LifecycleError>;
}
