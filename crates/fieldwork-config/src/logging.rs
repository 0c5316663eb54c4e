use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format for daemon log lines.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    Json,
    /// Single-line text for terminals.
    Compact,
}

/// Error returned when a log format name is not recognised.
pub type LogFormatParseError = strum::ParseError;
