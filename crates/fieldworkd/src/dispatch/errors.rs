//! Error types for request parsing and action handling.
//!
//! None of these reach the client verbatim: the router turns every failure
//! into the failing action's error token and logs the detail.

use std::io;

use thiserror::Error;

use crate::imaging::CodecError;
use crate::lifecycle::LifecycleError;
use crate::transport::LineError;

use super::action::Action;

/// Errors surfaced during request parsing and dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The control line was empty or not valid UTF-8.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// The action token is not one the daemon serves.
    #[error("unknown action: {action}")]
    UnknownAction { action: String },

    /// Wrong argument count or an unparseable argument.
    #[error("invalid arguments for {action}: {message}")]
    InvalidArguments { action: Action, message: String },

    /// The control line could not be read.
    #[error(transparent)]
    Line(#[from] LineError),

    /// IO error while writing the response.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),

    /// Attached images could not be read.
    #[error("image stream rejected: {0}")]
    Images(#[from] CodecError),

    /// The lifecycle operation failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl DispatchError {
    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates an unknown action error.
    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction {
            action: action.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(action: Action, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            action,
            message: message.into(),
        }
    }
}
