use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// TCP address the daemon listens on, written as `host:port`.
///
/// IPv6 literals use the bracketed form, for example `[::1]:5000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListenEndpoint {
    host: String,
    port: u16,
}

impl ListenEndpoint {
    /// Builds an endpoint from its parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or address literal, without brackets.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port. Zero asks the operating system for an ephemeral port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ListenEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ListenEndpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let (host, port) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
        let host = host
            .strip_prefix('[')
            .and_then(|inner| inner.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| EndpointParseError::InvalidPort(input.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for ListenEndpoint {
    type Error = EndpointParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ListenEndpoint> for String {
    fn from(value: ListenEndpoint) -> Self {
        value.to_string()
    }
}

/// Errors raised while parsing a [`ListenEndpoint`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointParseError {
    /// No `:port` suffix was present.
    #[error("missing port in listen address '{0}'")]
    MissingPort(String),
    /// The host part was empty.
    #[error("missing host in listen address '{0}'")]
    MissingHost(String),
    /// The port was not a number in `0..=65535`.
    #[error("invalid port in listen address '{0}'")]
    InvalidPort(String),
}
