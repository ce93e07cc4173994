//! Line transport (§4.A): framing raw TCP bytes into CRLF-terminated FSD
//! lines and back, over ISO-8859-1 bytes.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use log::{debug, warn};

use crate::error::TransportError;

/// Decodes a byte slice that is ISO-8859-1 (Latin-1) into a `String`.
///
/// Latin-1 maps byte values 0..=255 onto the first 256 Unicode code points
/// one-to-one, so no lookup table or external decoder is needed.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encodes a `&str` as ISO-8859-1 bytes. Characters outside the Latin-1
/// range are replaced with `?`, matching how the original client degrades
/// text it cannot represent on the wire.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| if (c as u32) < 256 { c as u8 } else { b'?' }).collect()
}

/// Buffers partial reads from a [`TcpStream`] and yields complete,
/// CRLF-terminated FSD lines with the terminator stripped.
///
/// A stray NUL byte occasionally appears at the start of a connection in
/// the wild; it is stripped rather than treated as a framing error.
pub struct LineTransport {
    stream: TcpStream,
    buffer: Vec<u8>,
}

impl LineTransport {
    pub fn connect(addr: &str, connect_timeout: Duration) -> Result<Self, TransportError> {
        let socket_addr = addr
            .parse()
            .map_err(|_| TransportError::Closed(format!("invalid address: {addr}")))?;
        let stream = TcpStream::connect_timeout(&socket_addr, connect_timeout)?;
        stream.set_nodelay(true).ok();
        Ok(LineTransport::new(stream))
    }

    pub fn new(stream: TcpStream) -> Self {
        LineTransport {
            stream,
            buffer: Vec::with_capacity(4096),
        }
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.stream.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Reads from the socket until at least one complete line is buffered,
    /// then returns the next complete line (CRLF stripped). Returns `Ok(None)`
    /// on a clean peer shutdown and `Err` on any I/O error other than a read
    /// timeout, which is retried by the caller's poll loop.
    pub fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            if let Some(pos) = find_line_end(&self.buffer) {
                let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
                let trimmed = strip_terminator(&raw);
                let line = decode_latin1(trimmed);
                if line.is_empty() {
                    continue;
                }
                return Ok(Some(line));
            }

            let mut chunk = [0u8; 4096];
            match self.stream.read(&mut chunk) {
                Ok(0) => return Ok(None),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                    return Err(TransportError::Connect(e));
                }
                Err(e) => {
                    warn!("transport read error: {e}");
                    return Err(TransportError::Connect(e));
                }
            }
        }
    }

    /// Writes one PDU line, appending the CRLF terminator, as a single
    /// write call (§4.A: outbound writes are atomic per PDU).
    pub fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut bytes = encode_latin1(line);
        bytes.extend_from_slice(b"\r\n");
        self.stream.write_all(&bytes)?;
        debug!("-> {line}");
        Ok(())
    }

    pub fn try_clone(&self) -> Result<LineTransport, TransportError> {
        Ok(LineTransport {
            stream: self.stream.try_clone()?,
            buffer: Vec::new(),
        })
    }

    /// Shuts down both directions of the underlying socket. `shutdown` acts
    /// on the socket itself rather than on this handle's file descriptor, so
    /// calling it here also unblocks a `read_line` blocked on a
    /// [`LineTransport::try_clone`]-produced handle held by another thread
    /// (§5 "disconnect ... closes the socket, which unblocks recv").
    pub fn shutdown(&self) {
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
    }
}

fn find_line_end(buffer: &[u8]) -> Option<usize> {
    buffer.iter().position(|&b| b == b'\n')
}

fn strip_terminator(raw: &[u8]) -> &[u8] {
    let mut end = raw.len();
    while end > 0 && matches!(raw[end - 1], b'\n' | b'\r' | 0) {
        end -= 1;
    }
    let mut start = 0;
    while start < end && raw[start] == 0 {
        start += 1;
    }
    &raw[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn latin1_round_trips_high_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let decoded = decode_latin1(&bytes);
        let encoded = encode_latin1(&decoded);
        assert_eq!(bytes, encoded);
    }

    #[test]
    fn strip_terminator_removes_crlf_and_leading_nul() {
        let raw = [0u8, b'$', b'D', b'I', b'\r', b'\n'];
        assert_eq!(strip_terminator(&raw), b"$DI");
    }

    #[test]
    fn reads_lines_split_across_reads() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            sock.write_all(b"$DISERVER:CLI").unwrap();
            thread::sleep(Duration::from_millis(20));
            sock.write_all(b"ENT:v1:abc\r\n#AP").unwrap();
            thread::sleep(Duration::from_millis(20));
            sock.write_all(b"N1:rest\r\n").unwrap();
            let mut buf = [0u8; 64];
            let _ = sock.read(&mut buf);
        });

        let stream = TcpStream::connect(addr).unwrap();
        let mut transport = LineTransport::new(stream);

        let first = transport.read_line().unwrap().unwrap();
        assert_eq!(first, "$DISERVER:CLIENT:v1:abc");
        let second = transport.read_line().unwrap().unwrap();
        assert_eq!(second, "#APN1:rest");

        server.join().unwrap();
    }
}
