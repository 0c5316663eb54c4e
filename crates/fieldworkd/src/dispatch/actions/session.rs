use crate::dispatch::errors::DispatchError;
use crate::dispatch::request::ActionRequest;
use crate::dispatch::response::{Reply, ResponseToken};
use crate::lifecycle::TicketService;

/// `LOGIN|user|credential`
pub(super) fn login(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(2)?;
    let accepted = service.login(arguments.text(0)?, arguments.text(1)?)?;
    Ok(Reply::either(
        accepted,
        ResponseToken::LoginOk,
        ResponseToken::LoginError,
    ))
}
