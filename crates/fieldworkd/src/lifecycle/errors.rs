use thiserror::Error;

use crate::imaging::CodecError;
use crate::store::{StoreError, TicketSelector};

/// Errors raised by ticket lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// No technician is registered under the login.
    #[error("unknown technician '{login}'")]
    UnknownTechnician { login: String },
    /// The ticket is not owned by the caller or not in a state that allows the
    /// requested transition.
    #[error("ticket {selector:?} is not available for this transition")]
    TicketUnavailable { selector: TicketSelector },
    /// An attached image failed validation; nothing from the batch was kept.
    #[error("image {index} rejected: {source}")]
    InvalidImage {
        index: usize,
        #[source]
        source: CodecError,
    },
    /// The batch itself was rejected before any image was examined.
    #[error(transparent)]
    Images(#[from] CodecError),
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<diesel::result::Error> for LifecycleError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Store(StoreError::Query(error))
    }
}
