//! CRLF line codec for tokio.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error::ProtocolError;

/// Longest line accepted in either direction, terminator included.
pub const MAX_IRC_LINE_LEN: usize = 8191;

/// Splits a byte stream into lines and frames outbound lines with CRLF.
///
/// Inbound lines come out without their terminator, decoded lossily as
/// UTF-8. Lines that are too long or carry NUL are discarded with a
/// warning instead of failing the stream, so one bad line from a server
/// does not cost the connection.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Dropping bytes until the end of an overlong line.
    discarding: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::with_max_len(MAX_IRC_LINE_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    fn validate_outbound(line: &str, max_len: usize) -> Result<(), ProtocolError> {
        if let Some(ch) = line.chars().find(|c| matches!(c, '\r' | '\n' | '\0')) {
            return Err(ProtocolError::IllegalControlChar(ch));
        }
        if line.len() + 2 > max_len {
            return Err(ProtocolError::MessageTooLong(line.len() + 2));
        }
        Ok(())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_len {
                    if !self.discarding {
                        warn!(len = src.len(), "discarding overlong inbound line");
                    }
                    self.discarding = true;
                    src.clear();
                    self.next_index = 0;
                } else {
                    self.next_index = src.len();
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }
            if line.len() > self.max_len {
                warn!(len = line.len(), "discarding overlong inbound line");
                continue;
            }

            let text = String::from_utf8_lossy(&line);
            let text = text.trim_end_matches(&['\r', '\n'][..]);
            if text.contains('\0') {
                warn!("discarding inbound line containing NUL");
                continue;
            }
            return Ok(Some(text.to_string()));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        // Unterminated tail at end of stream.
        let tail = src.split();
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) || tail.is_empty() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&tail);
        let text = text.trim_end_matches('\r');
        if text.is_empty() || text.contains('\0') {
            return Ok(None);
        }
        Ok(Some(text.to_string()))
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        Self::validate_outbound(&line, self.max_len)?;
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}
