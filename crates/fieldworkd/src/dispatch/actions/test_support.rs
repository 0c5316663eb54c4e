//! Helpers for driving action functions against a mocked service.

use std::io::Cursor;

use crate::dispatch::action::Action;
use crate::dispatch::errors::DispatchError;
use crate::dispatch::request::{ActionRequest, Arguments};
use crate::dispatch::response::Reply;
use crate::dispatch::router::ActionFn;
use crate::lifecycle::MockTicketService;

/// Runs `run` with `fields` as the arguments and `payload` as the stream that
/// follows the control line.
pub(super) fn invoke(
    service: &MockTicketService,
    run: ActionFn,
    action: Action,
    fields: &[&str],
    payload: &[u8],
) -> Result<Reply, DispatchError> {
    let values: Vec<String> = fields.iter().map(|field| (*field).to_owned()).collect();
    let mut stream = Cursor::new(payload.to_vec());
    let mut request = ActionRequest::new(Arguments::new(action, &values), &mut stream);
    run(service, &mut request)
}
