//! Mutating actions on a technician's tickets.

use tracing::debug;

use crate::dispatch::errors::DispatchError;
use crate::dispatch::request::ActionRequest;
use crate::dispatch::response::{Reply, ResponseToken};
use crate::dispatch::router::DISPATCH_TARGET;
use crate::imaging;
use crate::lifecycle::{DeleteOutcome, IncidentReport, StartOutcome, StartTicket, TicketService};

/// `START|user|ticketNo|lat|lon|timestamp`
pub(super) fn start(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(5)?;
    let login = arguments.text(0)?;
    let ticket = StartTicket {
        ticket_number: arguments.integer(1, "ticket number")?,
        latitude: arguments.coordinate(2, "latitude")?,
        longitude: arguments.coordinate(3, "longitude")?,
        started_at: arguments.timestamp(4, "start time")?,
    };
    let token = match service.start(login, &ticket)? {
        StartOutcome::Created { ticket_id } => {
            debug!(target: DISPATCH_TARGET, ticket_id, "ticket started");
            ResponseToken::StartOk
        }
        StartOutcome::AlreadyExists => ResponseToken::StartOkExisting,
        StartOutcome::AlreadyTerminated => ResponseToken::StartErrorTerminated,
    };
    Ok(Reply::token(token))
}

/// `FINISH|user|ticketNo|timestamp`
pub(super) fn finish(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(3)?;
    let closed = service.finish(
        arguments.text(0)?,
        arguments.integer(1, "ticket number")?,
        arguments.timestamp(2, "close time")?,
    )?;
    Ok(Reply::either(
        closed,
        ResponseToken::FinishOk,
        ResponseToken::FinishError,
    ))
}

/// `INCIDENT|user|ticketNo|reason|note`
pub(super) fn incident(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(4)?;
    let report = IncidentReport::new(arguments.text(2)?, arguments.text(3)?);
    let recorded = service.report_incident(
        arguments.text(0)?,
        arguments.integer(1, "ticket number")?,
        &report,
    )?;
    Ok(Reply::either(
        recorded,
        ResponseToken::IncidentOk,
        ResponseToken::IncidentError,
    ))
}

/// `INCIDENT_WITH_IMAGES|user|ticketNo|reason|note|count[|framing]` followed
/// by `count` image frames.
///
/// Every argument is checked before the first frame is read, and every frame
/// is read before the service is called.
pub(super) fn incident_with_images(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_range(5..=6)?;
    let login = arguments.text(0)?;
    let ticket_number = arguments.integer(1, "ticket number")?;
    let report = IncidentReport::new(arguments.text(2)?, arguments.text(3)?);
    let count = arguments.image_count(4)?;
    let framing = arguments.framing(5)?;

    let images = imaging::read_images(request.payload(), count, framing)?;
    debug!(
        target: DISPATCH_TARGET,
        ticket_number,
        images = images.len(),
        %framing,
        "image frames received"
    );
    let recorded = service.report_incident_with_images(login, ticket_number, &report, &images)?;
    Ok(Reply::either(
        recorded,
        ResponseToken::IncidentWithImagesOk,
        ResponseToken::IncidentWithImagesError,
    ))
}

/// `EDIT|user|ticketId|reason|description`
pub(super) fn edit(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(4)?;
    let report = IncidentReport::new(arguments.text(2)?, arguments.text(3)?);
    let edited = service.edit(arguments.text(0)?, arguments.integer(1, "ticket id")?, &report)?;
    Ok(Reply::either(
        edited,
        ResponseToken::EditOk,
        ResponseToken::EditError,
    ))
}

/// `DELETE|user|ticketId`
pub(super) fn delete(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(2)?;
    let token = match service.delete(arguments.text(0)?, arguments.integer(1, "ticket id")?)? {
        DeleteOutcome::Deleted => ResponseToken::DeleteOk,
        DeleteOutcome::Terminated => ResponseToken::DeleteErrorTerminated,
        DeleteOutcome::Rejected => ResponseToken::DeleteError,
    };
    Ok(Reply::token(token))
}

/// `RESUME|user|ticketId`
pub(super) fn resume(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(2)?;
    let resumed = service.resume(arguments.text(0)?, arguments.integer(1, "ticket id")?)?;
    Ok(Reply::either(
        resumed,
        ResponseToken::ResumeOk,
        ResponseToken::ResumeError,
    ))
}
