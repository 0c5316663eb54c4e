use std::io::{self, BufRead};

use super::LineError;

/// Reads one line of at most `limit` bytes, excluding its terminator.
///
/// Returns `Ok(None)` when the stream is already at end of input. A final
/// line without a terminator is returned as-is. Bytes after the newline stay
/// buffered in `reader`, so binary payloads can follow a control line.
pub(crate) fn read_bounded_line<R: BufRead + ?Sized>(
    reader: &mut R,
    limit: usize,
) -> Result<Option<Vec<u8>>, LineError> {
    let mut line = Vec::new();
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(LineError::Io(error)),
        };
        if available.is_empty() {
            return Ok((!line.is_empty()).then(|| strip_terminator(line)));
        }
        let (chunk, complete) = match available.iter().position(|byte| *byte == b'\n') {
            Some(newline) => (available.split_at(newline + 1).0, true),
            None => (available, false),
        };
        let consumed = chunk.len();
        line.extend_from_slice(chunk);
        reader.consume(consumed);
        enforce_limit(&line, limit)?;
        if complete {
            return Ok(Some(strip_terminator(line)));
        }
    }
}

fn enforce_limit(line: &[u8], limit: usize) -> Result<(), LineError> {
    let content = line.strip_suffix(b"\n").unwrap_or(line);
    let content = content.strip_suffix(b"\r").unwrap_or(content);
    if content.len() > limit {
        return Err(LineError::TooLong { limit });
    }
    Ok(())
}

fn strip_terminator(mut line: Vec<u8>) -> Vec<u8> {
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use super::*;

    #[test]
    fn leaves_trailing_bytes_buffered() {
        let mut reader = Cursor::new(b"LOGIN|ana|pw\r\n\x00\x01".to_vec());
        let line = read_bounded_line(&mut reader, 64).expect("read line");
        assert_eq!(line.as_deref(), Some(&b"LOGIN|ana|pw"[..]));

        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).expect("read rest");
        assert_eq!(rest, vec![0, 1]);
    }

    #[test]
    fn reassembles_lines_split_across_buffer_fills() {
        let mut reader = BufReader::with_capacity(4, Cursor::new(b"HISTORY|technician\n".to_vec()));
        let line = read_bounded_line(&mut reader, 64).expect("read line");
        assert_eq!(line.as_deref(), Some(&b"HISTORY|technician"[..]));
    }

    #[test]
    fn returns_unterminated_final_line() {
        let mut reader = Cursor::new(b"START|a".to_vec());
        let line = read_bounded_line(&mut reader, 64).expect("read line");
        assert_eq!(line.as_deref(), Some(&b"START|a"[..]));
    }

    #[test]
    fn end_of_input_yields_none() {
        let mut reader = Cursor::new(Vec::new());
        assert!(read_bounded_line(&mut reader, 64).expect("read").is_none());
    }

    #[test]
    fn rejects_lines_over_the_limit() {
        let mut reader = Cursor::new(vec![b'a'; 100]);
        let result = read_bounded_line(&mut reader, 10);
        assert!(matches!(result, Err(LineError::TooLong { limit: 10 })));
    }
}
