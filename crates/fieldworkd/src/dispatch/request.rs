//! Control-line parsing and typed argument access.
//!
//! A request is one line `ACTION|arg1|arg2|...`. Fields are split on `|`
//! and passed through without trimming, so free text keeps its spacing.

use std::io::BufRead;
use std::ops::RangeInclusive;

use chrono::{DateTime, NaiveDateTime};

use crate::imaging::{CodecError, Framing, MAX_IMAGES_PER_INCIDENT};

use super::action::Action;
use super::errors::DispatchError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A parsed control line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    action: String,
    arguments: Vec<String>,
}

impl CommandLine {
    /// Parses a control line with its terminator already removed.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let text = std::str::from_utf8(line)
            .map_err(|error| DispatchError::malformed(format!("control line is not UTF-8: {error}")))?;
        if text.trim().is_empty() {
            return Err(DispatchError::malformed("empty control line"));
        }
        let mut fields = text.split('|').map(str::to_owned);
        let action = fields.next().unwrap_or_default();
        Ok(Self {
            action,
            arguments: fields.collect(),
        })
    }

    /// The raw action token.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The fields after the action token.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

/// Positional arguments of a request, with parsing helpers that report
/// failures against the owning action.
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    action: Action,
    values: &'a [String],
}

impl<'a> Arguments<'a> {
    pub const fn new(action: Action, values: &'a [String]) -> Self {
        Self { action, values }
    }

    /// Requires exactly `expected` arguments.
    pub fn expect_count(&self, expected: usize) -> Result<(), DispatchError> {
        self.expect_range(expected..=expected)
    }

    /// Requires an argument count within `range`.
    pub fn expect_range(&self, range: RangeInclusive<usize>) -> Result<(), DispatchError> {
        if range.contains(&self.values.len()) {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "expected {}..={} arguments, got {}",
                range.start(),
                range.end(),
                self.values.len()
            )))
        }
    }

    pub fn text(&self, index: usize) -> Result<&'a str, DispatchError> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.invalid(format!("missing argument {index}")))
    }

    pub fn integer(&self, index: usize, field: &str) -> Result<i32, DispatchError> {
        let raw = self.text(index)?;
        raw.trim()
            .parse()
            .map_err(|_| self.invalid(format!("{field} '{raw}' is not an integer")))
    }

    pub fn coordinate(&self, index: usize, field: &str) -> Result<f64, DispatchError> {
        let raw = self.text(index)?;
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.invalid(format!("{field} '{raw}' is not a coordinate")))
    }

    pub fn timestamp(&self, index: usize, field: &str) -> Result<NaiveDateTime, DispatchError> {
        let raw = self.text(index)?;
        parse_timestamp(raw.trim())
            .ok_or_else(|| self.invalid(format!("{field} '{raw}' is not a timestamp")))
    }

    /// Announced image count. Counts above the per-incident limit are refused
    /// here, before any payload is read.
    pub fn image_count(&self, index: usize) -> Result<usize, DispatchError> {
        let raw = self.text(index)?;
        let count = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| self.invalid(format!("image count '{raw}' is not a count")))?;
        if count > MAX_IMAGES_PER_INCIDENT {
            return Err(CodecError::TooManyImages {
                count,
                max: MAX_IMAGES_PER_INCIDENT,
            }
            .into());
        }
        Ok(count)
    }

    /// Optional framing flag; absent means [`Framing::Raw`].
    pub fn framing(&self, index: usize) -> Result<Framing, DispatchError> {
        match self.values.get(index) {
            None => Ok(Framing::default()),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| self.invalid(format!("unknown framing '{raw}'"))),
        }
    }

    fn invalid(&self, message: String) -> DispatchError {
        DispatchError::invalid_arguments(self.action, message)
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS[.fff]`, the same with a space separator, or
/// RFC 3339 with an offset (normalised to UTC).
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|parsed| parsed.naive_utc())
        })
}

/// A routed request: typed arguments plus the rest of the connection for
/// actions that stream payloads after the control line.
pub struct ActionRequest<'a> {
    arguments: Arguments<'a>,
    payload: &'a mut dyn BufRead,
}

impl<'a> ActionRequest<'a> {
    pub fn new(arguments: Arguments<'a>, payload: &'a mut dyn BufRead) -> Self {
        Self { arguments, payload }
    }

    pub const fn arguments(&self) -> Arguments<'a> {
        self.arguments
    }

    pub fn payload(&mut self) -> &mut (dyn BufRead + 'a) {
        &mut *self.payload
    }
}
