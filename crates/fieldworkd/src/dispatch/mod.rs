//! Command dispatch for technician requests.
//!
//! This module reads the control line of each connection, routes it through
//! a registry of action handlers built once at startup, and writes the single
//! terminal reply. It plugs into the transport layer via the
//! `ConnectionHandler` trait.
//!
//! ## Protocol
//!
//! Clients send one UTF-8 line of `|`-separated fields, the action first:
//!
//! ```text
//! START|ana|100|40.4168|-3.7038|2024-01-01T09:00:00
//! ```
//!
//! The daemon answers with one status token line, one JSON line for
//! `HISTORY` and `TICKET_DETAIL`, or a JSON metadata line plus a payload
//! frame for `IMAGE_DATA`:
//!
//! ```text
//! START_OK
//! ```
//!
//! `INCIDENT_WITH_IMAGES` streams its image frames straight after the control
//! line. Both image actions take an optional trailing framing flag, `RAW`
//! (the default) or `BASE64`.
//!
//! ## Failures
//!
//! Every failure of a known action answers that action's error token. Lines
//! that do not name a served action answer `ERROR_UNKNOWN_ACTION`, and
//! failures reading the line or inside a handler answer `SERVER_ERROR`.

mod action;
mod actions;
mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::action::Action;
pub use self::errors::DispatchError;
pub use self::handler::DispatchConnectionHandler;
pub use self::request::{ActionRequest, Arguments, CommandLine, parse_timestamp};
pub use self::response::{ImageReply, Reply, ResponseToken};
pub use self::router::{ActionHandler, ActionRegistry, ActionRouter};
