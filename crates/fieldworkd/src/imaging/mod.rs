//! Image payloads attached to incident reports.
//!
//! Every image travels as a metadata line `filename|mediaType|declaredSize`
//! followed by its bytes in one of two framings:
//!
//! - [`Framing::Raw`] sends exactly `declaredSize` bytes with no terminator.
//! - [`Framing::Base64`] sends one line of standard base64.
//!
//! Outbound image downloads use the same framing names: raw framing writes a
//! four-byte big-endian length followed by the bytes.

mod codec;
mod errors;

use strum::{Display, EnumString};

pub use codec::{encode_frame, read_image, read_images, write_payload};
pub use errors::CodecError;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Most images one incident report may carry.
pub const MAX_IMAGES_PER_INCIDENT: usize = 5;

const IMAGE_MEDIA_PREFIX: &str = "image/";

/// Payload framing negotiated per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Framing {
    /// Length-delimited binary bytes.
    #[default]
    #[strum(serialize = "RAW")]
    Raw,
    /// One base64 text line per payload.
    #[strum(serialize = "BASE64")]
    Base64,
}

/// Metadata announced ahead of an image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    filename: String,
    media_type: String,
    declared_size: u64,
}

impl ImageMetadata {
    #[must_use]
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, declared_size: u64) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            declared_size,
        }
    }

    /// Parses `filename|mediaType|declaredSize`. The filename may itself
    /// contain `|`; the last two fields are taken from the right.
    pub fn parse(line: &str) -> Result<Self, CodecError> {
        let malformed = || CodecError::MalformedMetadata {
            line: line.to_owned(),
        };
        let mut fields = line.rsplitn(3, '|');
        let size = fields.next().ok_or_else(malformed)?;
        let media_type = fields.next().ok_or_else(malformed)?;
        let filename = fields.next().ok_or_else(malformed)?;
        if filename.is_empty() {
            return Err(malformed());
        }
        let declared_size = size.trim().parse::<u64>().map_err(|_| malformed())?;
        Ok(Self::new(filename, media_type, declared_size))
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub const fn declared_size(&self) -> u64 {
        self.declared_size
    }

    /// Checks the declared size, then the media type.
    pub fn validate(&self) -> Result<(), CodecError> {
        check_size(self.declared_size)?;
        let is_image = self
            .media_type
            .get(..IMAGE_MEDIA_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_MEDIA_PREFIX));
        if is_image {
            Ok(())
        } else {
            Err(CodecError::UnsupportedMediaType {
                media_type: self.media_type.clone(),
            })
        }
    }
}

/// An image received from a technician, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingImage {
    metadata: ImageMetadata,
    payload: Vec<u8>,
}

impl IncomingImage {
    #[must_use]
    pub const fn new(metadata: ImageMetadata, payload: Vec<u8>) -> Self {
        Self { metadata, payload }
    }

    #[must_use]
    pub const fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Full validation applied before an image is persisted.
    pub fn validate(&self) -> Result<(), CodecError> {
        self.metadata.validate()?;
        check_payload(&self.payload)
    }
}

fn check_size(size: u64) -> Result<(), CodecError> {
    let max = MAX_IMAGE_BYTES as u64;
    if size > max {
        Err(CodecError::Oversized { size, max })
    } else {
        Ok(())
    }
}

fn check_payload(payload: &[u8]) -> Result<(), CodecError> {
    if payload.is_empty() {
        return Err(CodecError::EmptyPayload);
    }
    check_size(payload.len() as u64)
}
