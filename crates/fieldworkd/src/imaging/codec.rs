use std::io::{self, BufRead, Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::transport::read_bounded_line;

use super::{
    CodecError, Framing, ImageMetadata, IncomingImage, MAX_IMAGE_BYTES, MAX_IMAGES_PER_INCIDENT,
    check_payload,
};

const METADATA_LINE_LIMIT: usize = 4 * 1024;
// Encoded length of the largest image plus a CRLF terminator.
const BASE64_LINE_LIMIT: usize = MAX_IMAGE_BYTES.div_ceil(3) * 4 + 2;

/// Reads `count` consecutive image frames.
///
/// Fails before consuming anything when `count` exceeds
/// [`MAX_IMAGES_PER_INCIDENT`].
pub fn read_images<R: BufRead + ?Sized>(
    reader: &mut R,
    count: usize,
    framing: Framing,
) -> Result<Vec<IncomingImage>, CodecError> {
    if count > MAX_IMAGES_PER_INCIDENT {
        return Err(CodecError::TooManyImages {
            count,
            max: MAX_IMAGES_PER_INCIDENT,
        });
    }
    (0..count).map(|_| read_image(reader, framing)).collect()
}

/// Reads one metadata line and its payload.
///
/// Validation runs in order: declared size, media type, payload decoding,
/// decoded length. A failed check stops reading, so the remainder of the
/// stream is left unconsumed.
pub fn read_image<R: BufRead + ?Sized>(
    reader: &mut R,
    framing: Framing,
) -> Result<IncomingImage, CodecError> {
    let line = read_bounded_line(reader, METADATA_LINE_LIMIT)?.ok_or(CodecError::MissingMetadata)?;
    let metadata = ImageMetadata::parse(&String::from_utf8_lossy(&line))?;
    metadata.validate()?;
    let payload = match framing {
        Framing::Raw => read_raw(reader, metadata.declared_size())?,
        Framing::Base64 => read_base64(reader)?,
    };
    check_payload(&payload)?;
    Ok(IncomingImage::new(metadata, payload))
}

fn read_raw<R: BufRead + ?Sized>(reader: &mut R, declared: u64) -> Result<Vec<u8>, CodecError> {
    let expected = usize::try_from(declared).map_err(|_| CodecError::Oversized {
        size: declared,
        max: MAX_IMAGE_BYTES as u64,
    })?;
    let mut payload = vec![0; expected];
    match reader.read_exact(&mut payload) {
        Ok(()) => Ok(payload),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
            Err(CodecError::Truncated { expected })
        }
        Err(error) => Err(CodecError::Io(error)),
    }
}

fn read_base64<R: BufRead + ?Sized>(reader: &mut R) -> Result<Vec<u8>, CodecError> {
    let line = read_bounded_line(reader, BASE64_LINE_LIMIT)?.unwrap_or_default();
    Ok(STANDARD.decode(line.trim_ascii())?)
}

/// Encodes an image the way a technician's device sends it: metadata line,
/// then the payload in `framing`.
#[must_use]
pub fn encode_frame(image: &IncomingImage, framing: Framing) -> Vec<u8> {
    let metadata = image.metadata();
    let mut frame = format!(
        "{}|{}|{}\n",
        metadata.filename(),
        metadata.media_type(),
        metadata.declared_size()
    )
    .into_bytes();
    match framing {
        Framing::Raw => frame.extend_from_slice(image.payload()),
        Framing::Base64 => {
            frame.extend_from_slice(STANDARD.encode(image.payload()).as_bytes());
            frame.push(b'\n');
        }
    }
    frame
}

/// Writes an outbound payload: a big-endian `u32` length and the bytes for
/// raw framing, or a single base64 line.
pub fn write_payload<W: Write + ?Sized>(
    writer: &mut W,
    payload: &[u8],
    framing: Framing,
) -> io::Result<()> {
    match framing {
        Framing::Raw => {
            let length = u32::try_from(payload.len()).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "payload exceeds u32 length")
            })?;
            writer.write_all(&length.to_be_bytes())?;
            writer.write_all(payload)
        }
        Framing::Base64 => {
            writer.write_all(STANDARD.encode(payload).as_bytes())?;
            writer.write_all(b"\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn jpeg() -> IncomingImage {
        let payload: Vec<u8> = (0..=255).cycle().take(3000).collect();
        IncomingImage::new(
            ImageMetadata::new("site.jpg", "image/jpeg", payload.len() as u64),
            payload,
        )
    }

    #[rstest]
    #[case(Framing::Raw)]
    #[case(Framing::Base64)]
    fn frames_decode_to_the_original_bytes(jpeg: IncomingImage, #[case] framing: Framing) {
        let mut reader = Cursor::new(encode_frame(&jpeg, framing));
        let decoded = read_image(&mut reader, framing).expect("decode frame");
        assert_eq!(decoded, jpeg);
    }

    #[rstest]
    #[case(Framing::Raw)]
    #[case(Framing::Base64)]
    fn consecutive_frames_do_not_bleed_into_each_other(
        jpeg: IncomingImage,
        #[case] framing: Framing,
    ) {
        let second = IncomingImage::new(ImageMetadata::new("b.png", "image/png", 3), vec![1, 2, 3]);
        let mut stream = encode_frame(&jpeg, framing);
        stream.extend(encode_frame(&second, framing));
        stream.extend_from_slice(b"trailer");
        let mut reader = Cursor::new(stream);

        let images = read_images(&mut reader, 2, framing).expect("decode frames");
        assert_eq!(images, vec![jpeg, second]);

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).expect("read trailer");
        assert_eq!(rest, b"trailer");
    }

    #[test]
    fn more_than_five_images_fail_before_reading() {
        let mut reader = Cursor::new(b"a.png|image/png|1\nx".to_vec());
        let result = read_images(&mut reader, MAX_IMAGES_PER_INCIDENT + 1, Framing::Raw);
        assert!(matches!(result, Err(CodecError::TooManyImages { count: 6, .. })));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn zero_images_read_nothing() {
        let mut reader = Cursor::new(b"left alone".to_vec());
        let images = read_images(&mut reader, 0, Framing::Raw).expect("empty batch");
        assert!(images.is_empty());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn oversized_declarations_fail_before_the_payload_is_read() {
        let header = format!("huge.jpg|image/jpeg|{}\n", MAX_IMAGE_BYTES + 1);
        let mut reader = Cursor::new(header.clone().into_bytes());
        let result = read_image(&mut reader, Framing::Raw);
        assert!(matches!(result, Err(CodecError::Oversized { .. })));
        assert_eq!(reader.position(), header.len() as u64);
    }

    #[test]
    fn non_image_media_types_are_rejected() {
        let mut reader = Cursor::new(b"notes.txt|text/plain|4\nabcd".to_vec());
        let result = read_image(&mut reader, Framing::Raw);
        assert!(matches!(result, Err(CodecError::UnsupportedMediaType { .. })));
    }

    #[test]
    fn short_raw_payloads_are_truncation_errors() {
        let mut reader = Cursor::new(b"a.png|image/png|10\nabc".to_vec());
        let result = read_image(&mut reader, Framing::Raw);
        assert!(matches!(result, Err(CodecError::Truncated { expected: 10 })));
    }

    #[test]
    fn undecodable_base64_is_rejected() {
        let mut reader = Cursor::new(b"a.png|image/png|3\n***\n".to_vec());
        let result = read_image(&mut reader, Framing::Base64);
        assert!(matches!(result, Err(CodecError::InvalidBase64(_))));
    }

    #[test]
    fn base64_lines_tolerate_crlf() {
        let mut reader = Cursor::new(b"a.png|image/png|3\r\nAQID\r\n".to_vec());
        let image = read_image(&mut reader, Framing::Base64).expect("decode");
        assert_eq!(image.payload(), &[1, 2, 3]);
        assert_eq!(image.metadata().declared_size(), 3);
    }

    #[test]
    fn missing_metadata_is_reported() {
        let mut reader = Cursor::new(Vec::new());
        let result = read_image(&mut reader, Framing::Raw);
        assert!(matches!(result, Err(CodecError::MissingMetadata)));
    }

    #[rstest]
    #[case(Framing::Raw, vec![0, 0, 0, 3, 7, 8, 9])]
    #[case(Framing::Base64, b"BwgJ\n".to_vec())]
    fn outbound_payload_framing(#[case] framing: Framing, #[case] expected: Vec<u8>) {
        let mut written = Vec::new();
        write_payload(&mut written, &[7, 8, 9], framing).expect("write payload");
        assert_eq!(written, expected);
    }
}
