//! Response tokens and the writer that frames them on the wire.
//!
//! Every response is terminal: a single token line, a single JSON line, or
//! for image downloads a JSON metadata line followed by the framed payload.

use std::io::Write;

use crate::imaging::{self, Framing};

use super::errors::DispatchError;

/// Terminal status tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseToken {
    LoginOk,
    LoginError,
    StartOk,
    StartOkExisting,
    StartErrorTerminated,
    StartError,
    FinishOk,
    FinishError,
    IncidentOk,
    IncidentError,
    IncidentWithImagesOk,
    IncidentWithImagesError,
    HistoryError,
    TicketDetailError,
    ImageDataError,
    EditOk,
    EditError,
    DeleteOk,
    DeleteErrorTerminated,
    DeleteError,
    ResumeOk,
    ResumeError,
    UnknownAction,
    ServerError,
}

impl ResponseToken {
    /// Wire spelling of the token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginOk => "LOGIN_OK",
            Self::LoginError => "LOGIN_ERROR",
            Self::StartOk => "START_OK",
            Self::StartOkExisting => "START_OK_EXISTENTE",
            Self::StartErrorTerminated => "START_ERROR_FINALIZADO",
            Self::StartError => "START_ERROR",
            Self::FinishOk => "FINISH_OK",
            Self::FinishError => "FINISH_ERROR",
            Self::IncidentOk => "INCIDENT_OK",
            Self::IncidentError => "INCIDENT_ERROR",
            Self::IncidentWithImagesOk => "INCIDENT_WITH_IMAGES_OK",
            Self::IncidentWithImagesError => "INCIDENT_WITH_IMAGES_ERROR",
            Self::HistoryError => "HISTORY_ERROR",
            Self::TicketDetailError => "TICKET_DETAIL_ERROR",
            Self::ImageDataError => "IMAGE_DATA_ERROR",
            Self::EditOk => "EDIT_OK",
            Self::EditError => "EDIT_ERROR",
            Self::DeleteOk => "DELETE_OK",
            Self::DeleteErrorTerminated => "DELETE_ERROR_TERMINADO",
            Self::DeleteError => "DELETE_ERROR",
            Self::ResumeOk => "RESUME_OK",
            Self::ResumeError => "RESUME_ERROR",
            Self::UnknownAction => "ERROR_UNKNOWN_ACTION",
            Self::ServerError => "SERVER_ERROR",
        }
    }
}

/// An image download: JSON metadata line plus payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReply {
    pub metadata: String,
    pub payload: Vec<u8>,
    pub framing: Framing,
}

/// The single response produced for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Token(ResponseToken),
    Json(String),
    Image(ImageReply),
}

impl Reply {
    #[must_use]
    pub const fn token(token: ResponseToken) -> Self {
        Self::Token(token)
    }

    /// Serialises `value` as a single JSON line.
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Self, DispatchError> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }

    /// Chooses between two tokens on a boolean outcome.
    #[must_use]
    pub const fn either(success: bool, ok: ResponseToken, error: ResponseToken) -> Self {
        if success { Self::Token(ok) } else { Self::Token(error) }
    }
}

/// Writes replies to a client stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `reply` and flushes.
    pub fn write_reply(&mut self, reply: &Reply) -> Result<(), DispatchError> {
        match reply {
            Reply::Token(token) => self.write_line(token.as_str())?,
            Reply::Json(body) => self.write_line(body)?,
            Reply::Image(image) => {
                self.write_line(&image.metadata)?;
                imaging::write_payload(&mut self.writer, &image.payload, image.framing)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), DispatchError> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}
