//! Read-only actions. Successful replies carry JSON rather than a token.

use crate::dispatch::errors::DispatchError;
use crate::dispatch::request::ActionRequest;
use crate::dispatch::response::{ImageReply, Reply, ResponseToken};
use crate::lifecycle::TicketService;

/// `HISTORY|user`
pub(super) fn history(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(1)?;
    let tickets = service.history(arguments.text(0)?)?;
    Reply::json(&tickets)
}

/// `TICKET_DETAIL|user|ticketId`
pub(super) fn ticket_detail(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_count(2)?;
    match service.detail(arguments.text(0)?, arguments.integer(1, "ticket id")?)? {
        Some(detail) => Reply::json(&detail),
        None => Ok(Reply::token(ResponseToken::TicketDetailError)),
    }
}

/// `IMAGE_DATA|user|imageId[|framing]`
pub(super) fn image_data(
    service: &dyn TicketService,
    request: &mut ActionRequest<'_>,
) -> Result<Reply, DispatchError> {
    let arguments = request.arguments();
    arguments.expect_range(2..=3)?;
    let framing = arguments.framing(2)?;
    let Some(image) = service.image(arguments.text(0)?, arguments.integer(1, "image id")?)? else {
        return Ok(Reply::token(ResponseToken::ImageDataError));
    };
    Ok(Reply::Image(ImageReply {
        metadata: serde_json::to_string(image.record())?,
        payload: image.payload().to_vec(),
        framing,
    }))
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::dispatch::action::Action;
    use crate::dispatch::actions::test_support::invoke;
    use crate::imaging::Framing;
    use crate::lifecycle::{MockTicketService, TicketStatus, fixtures};

    fn json(reply: &Reply) -> Value {
        match reply {
            Reply::Json(body) => serde_json::from_str(body).expect("valid json"),
            other => panic!("expected a JSON reply, got {other:?}"),
        }
    }

    #[test]
    fn history_serialises_every_ticket() {
        let mut service = MockTicketService::new();
        service.expect_history().with(eq("ana")).returning(|_| {
            Ok(vec![
                fixtures::summary(2, 101, TicketStatus::Pending),
                fixtures::summary(1, 100, TicketStatus::Terminated),
            ])
        });

        let reply = invoke(&service, history, Action::History, &["ana"], b"").expect("reply");
        let body = json(&reply);
        let entries = body.as_array().expect("array");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["numero_ticket"], 101);
        assert_eq!(entries[1]["estado"], "Terminado");
        assert!(entries[0]["fecha_cierre"].is_null());
    }

    #[test]
    fn empty_history_is_an_empty_array() {
        let mut service = MockTicketService::new();
        service.expect_history().returning(|_| Ok(Vec::new()));

        let reply = invoke(&service, history, Action::History, &["ana"], b"").expect("reply");
        assert_eq!(reply, Reply::Json("[]".to_owned()));
    }

    #[test]
    fn missing_tickets_answer_detail_error() {
        let mut service = MockTicketService::new();
        service
            .expect_detail()
            .with(eq("ana"), eq(9))
            .returning(|_, _| Ok(None));

        let reply = invoke(&service, ticket_detail, Action::TicketDetail, &["ana", "9"], b"")
            .expect("reply");
        assert_eq!(reply, Reply::token(ResponseToken::TicketDetailError));
    }

    #[rstest]
    #[case(&["ana", "4"], Framing::Raw)]
    #[case(&["ana", "4", "base64"], Framing::Base64)]
    fn image_data_sends_metadata_then_payload(#[case] fields: &[&str], #[case] framing: Framing) {
        let mut service = MockTicketService::new();
        service
            .expect_image()
            .with(eq("ana"), eq(4))
            .returning(|_, id| Ok(Some(fixtures::stored_image(id, vec![9, 8, 7]))));

        let reply = invoke(&service, image_data, Action::ImageData, fields, b"").expect("reply");
        let Reply::Image(image) = reply else {
            panic!("expected an image reply");
        };
        assert_eq!(image.payload, vec![9, 8, 7]);
        assert_eq!(image.framing, framing);
        let metadata: Value = serde_json::from_str(&image.metadata).expect("metadata json");
        assert_eq!(metadata["id"], 4);
        assert_eq!(metadata["nombre"], "site.png");
        assert_eq!(metadata["tamaño"], 3);
    }

    #[test]
    fn unknown_images_answer_image_data_error() {
        let mut service = MockTicketService::new();
        service.expect_image().returning(|_, _| Ok(None));

        let reply = invoke(&service, image_data, Action::ImageData, &["ana", "4"], b"").expect("reply");
        assert_eq!(reply, Reply::token(ResponseToken::ImageDataError));
    }
}
