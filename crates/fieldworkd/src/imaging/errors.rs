use std::io;

use thiserror::Error;

use crate::transport::LineError;

/// Errors raised while reading, validating, or writing image frames.
#[derive(Debug, Error)]
pub enum CodecError {
    /// More images were announced than a single incident accepts.
    #[error("{count} images announced, at most {max} allowed")]
    TooManyImages {
        /// Announced count.
        count: usize,
        /// Upper bound.
        max: usize,
    },
    /// The stream ended where a metadata line was expected.
    #[error("stream ended before image metadata")]
    MissingMetadata,
    /// The metadata line did not have the `filename|mediaType|size` shape.
    #[error("malformed image metadata '{line}'")]
    MalformedMetadata {
        /// Offending line, lossily decoded.
        line: String,
    },
    /// Declared or decoded size exceeds the per-image limit.
    #[error("image of {size} bytes exceeds the {max} byte limit")]
    Oversized {
        /// Size in bytes.
        size: u64,
        /// Upper bound.
        max: u64,
    },
    /// The media type is not an image type.
    #[error("media type '{media_type}' is not an image type")]
    UnsupportedMediaType {
        /// Declared media type.
        media_type: String,
    },
    /// The payload contained no bytes.
    #[error("image payload is empty")]
    EmptyPayload,
    /// The stream ended before the declared number of payload bytes arrived.
    #[error("image payload truncated, expected {expected} bytes")]
    Truncated {
        /// Declared size.
        expected: usize,
    },
    /// A base64 payload line did not decode.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    /// A metadata or payload line could not be read.
    #[error(transparent)]
    Line(#[from] LineError),
    /// Underlying stream failure.
    #[error("image stream I/O failed: {0}")]
    Io(#[from] io::Error),
}
