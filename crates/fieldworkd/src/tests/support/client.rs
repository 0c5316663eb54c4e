//! A minimal technician device speaking the line protocol over TCP.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::imaging::Framing;

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// What came back on one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A single line: a status token or a JSON document.
    Line(String),
    /// An image download: metadata line plus decoded payload.
    Image { metadata: String, payload: Vec<u8> },
    /// The daemon closed without answering.
    Closed,
}

impl Response {
    /// The reply line, or an empty string for closed connections.
    #[must_use]
    pub fn line(&self) -> &str {
        match self {
            Self::Line(line) => line,
            Self::Image { metadata, .. } => metadata,
            Self::Closed => "",
        }
    }

    /// Parses the reply line as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(self.line()).expect("response is JSON")
    }
}

/// Opens one connection per request, like the mobile client.
#[derive(Debug, Clone, Copy)]
pub struct TechnicianClient {
    addr: SocketAddr,
}

impl TechnicianClient {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Sends `line` and returns the single-line reply.
    pub fn send(&self, line: &str) -> Response {
        self.exchange(line.as_bytes(), b"", |reader| read_line(reader))
    }

    /// Sends `line` followed by `payload` bytes.
    pub fn send_with_payload(&self, line: &str, payload: &[u8]) -> Response {
        self.exchange(line.as_bytes(), payload, |reader| read_line(reader))
    }

    /// Requests an image and decodes its frame.
    pub fn fetch_image(&self, line: &str, framing: Framing) -> Response {
        self.exchange(line.as_bytes(), b"", |reader| {
            let metadata = match read_line(reader) {
                Response::Line(metadata) if metadata.starts_with('{') => metadata,
                other => return other,
            };
            let payload = match framing {
                Framing::Raw => {
                    let mut length = [0_u8; 4];
                    reader.read_exact(&mut length).expect("read length prefix");
                    let mut payload = vec![0; u32::from_be_bytes(length) as usize];
                    reader.read_exact(&mut payload).expect("read payload");
                    payload
                }
                Framing::Base64 => {
                    let mut line = String::new();
                    reader.read_line(&mut line).expect("read base64 line");
                    STANDARD.decode(line.trim_end()).expect("valid base64")
                }
            };
            Response::Image { metadata, payload }
        })
    }

    fn exchange(
        &self,
        line: &[u8],
        payload: &[u8],
        read: impl FnOnce(&mut BufReader<TcpStream>) -> Response,
    ) -> Response {
        let mut stream = TcpStream::connect(self.addr).expect("connect to daemon");
        stream
            .set_read_timeout(Some(READ_TIMEOUT))
            .expect("set read timeout");
        stream.write_all(line).expect("write control line");
        stream.write_all(b"\n").expect("write newline");
        stream.write_all(payload).expect("write payload");
        stream.flush().expect("flush request");
        let mut reader = BufReader::new(stream);
        let response = read(&mut reader);
        let mut rest = Vec::new();
        if reader.read_to_end(&mut rest).is_ok() {
            assert!(rest.is_empty(), "unexpected trailing bytes: {rest:?}");
        }
        response
    }
}

fn read_line(reader: &mut BufReader<TcpStream>) -> Response {
    let mut line = String::new();
    match reader.read_line(&mut line).expect("read response") {
        0 => Response::Closed,
        _ => Response::Line(line.trim_end().to_owned()),
    }
}
