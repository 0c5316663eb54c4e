use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

/// Ticket lifecycle state as persisted and reported on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, IntoStaticStr,
)]
pub enum TicketStatus {
    /// Created by a start and awaiting work.
    #[strum(serialize = "Pendiente")]
    #[serde(rename = "Pendiente")]
    Pending,
    /// Being worked on.
    #[strum(serialize = "En Proceso")]
    #[serde(rename = "En Proceso")]
    InProgress,
    /// Closed by a finish. Terminal.
    #[strum(serialize = "Terminado")]
    #[serde(rename = "Terminado")]
    Terminated,
    /// Interrupted by an incident; may resume.
    #[strum(serialize = "Cancelado")]
    #[serde(rename = "Cancelado")]
    Cancelled,
    /// Soft-deleted by its technician. Terminal.
    #[strum(serialize = "Borrado")]
    #[serde(rename = "Borrado")]
    Deleted,
}

impl TicketStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::InProgress,
        Self::Terminated,
        Self::Cancelled,
        Self::Deleted,
    ];

    /// Persisted and wire spelling.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether no further transition may leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Deleted)
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Pending => matches!(
                next,
                Self::InProgress | Self::Terminated | Self::Cancelled | Self::Deleted
            ),
            Self::InProgress => matches!(next, Self::Terminated | Self::Cancelled),
            Self::Cancelled => matches!(
                next,
                Self::Pending | Self::Terminated | Self::Cancelled | Self::Deleted
            ),
            Self::Terminated | Self::Deleted => false,
        }
    }

    /// Statuses from which `target` is reachable in one step.
    #[must_use]
    pub fn sources_of(target: Self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|status| status.can_transition_to(target))
            .collect()
    }

    /// Statuses whose reason and description may still be edited.
    #[must_use]
    pub fn editable() -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|status| !status.is_terminal())
            .collect()
    }
}
