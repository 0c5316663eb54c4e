//! Built-in action implementations.
//!
//! Each function validates its arguments, calls the ticket service, and maps
//! the outcome to a reply. Errors are returned to the router, which logs them
//! and answers with the action's failure token.

mod queries;
mod session;
mod tickets;

#[cfg(test)]
mod test_support;

use super::action::Action;
use super::router::ActionFn;

/// Every served action with its implementation.
pub(super) const STANDARD: [(Action, ActionFn); 11] = [
    (Action::Login, session::login),
    (Action::Start, tickets::start),
    (Action::Finish, tickets::finish),
    (Action::Incident, tickets::incident),
    (Action::IncidentWithImages, tickets::incident_with_images),
    (Action::History, queries::history),
    (Action::TicketDetail, queries::ticket_detail),
    (Action::ImageData, queries::image_data),
    (Action::Edit, tickets::edit),
    (Action::Delete, tickets::delete),
    (Action::Resume, tickets::resume),
];
