//! Action tokens recognised on the control line.

use std::fmt;

use super::errors::DispatchError;
use super::response::ResponseToken;

/// Operations a technician's device can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Login,
    Start,
    Finish,
    Incident,
    IncidentWithImages,
    History,
    TicketDetail,
    ImageData,
    Edit,
    Delete,
    Resume,
}

impl Action {
    /// Every served action.
    pub const ALL: [Self; 11] = [
        Self::Login,
        Self::Start,
        Self::Finish,
        Self::Incident,
        Self::IncidentWithImages,
        Self::History,
        Self::TicketDetail,
        Self::ImageData,
        Self::Edit,
        Self::Delete,
        Self::Resume,
    ];

    /// Parses an action token, ignoring ASCII case.
    pub fn parse(token: &str) -> Result<Self, DispatchError> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| DispatchError::unknown_action(token))
    }

    /// Wire spelling of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Start => "START",
            Self::Finish => "FINISH",
            Self::Incident => "INCIDENT",
            Self::IncidentWithImages => "INCIDENT_WITH_IMAGES",
            Self::History => "HISTORY",
            Self::TicketDetail => "TICKET_DETAIL",
            Self::ImageData => "IMAGE_DATA",
            Self::Edit => "EDIT",
            Self::Delete => "DELETE",
            Self::Resume => "RESUME",
        }
    }

    /// Token sent when the action fails for any reason not given a more
    /// specific token.
    #[must_use]
    pub const fn failure_token(self) -> ResponseToken {
        match self {
            Self::Login => ResponseToken::LoginError,
            Self::Start => ResponseToken::StartError,
            Self::Finish => ResponseToken::FinishError,
            Self::Incident => ResponseToken::IncidentError,
            Self::IncidentWithImages => ResponseToken::IncidentWithImagesError,
            Self::History => ResponseToken::HistoryError,
            Self::TicketDetail => ResponseToken::TicketDetailError,
            Self::ImageData => ResponseToken::ImageDataError,
            Self::Edit => ResponseToken::EditError,
            Self::Delete => ResponseToken::DeleteError,
            Self::Resume => ResponseToken::ResumeError,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
