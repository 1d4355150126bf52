//! Newline-delimited JSON framing.
//!
//! Each frame is exactly one UTF-8 JSON object followed by `\n`. A leading
//! U+FEFF (BOM) on a received frame is stripped before parsing, and a `\r`
//! before the terminator is tolerated. There are no length prefixes; the
//! [`FrameBuffer`] accumulates raw bytes and yields complete frames, so
//! callers do byte-level socket I/O with explicit flushes instead of going
//! through a buffered text reader.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// UTF-8 encoding of U+FEFF.
const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Framing and serialization failures.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The peer sent more bytes than the frame cap without a newline.
    #[error("frame exceeds {max} bytes without a terminator")]
    FrameTooLarge { max: usize },
}

/// Serialize one message into a newline-terminated frame.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, WireError> {
    let mut bytes = serde_json::to_vec(message)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Parse one frame, stripping a leading BOM and trailing `\r`/`\n`.
pub fn decode<T: DeserializeOwned>(frame: &[u8]) -> Result<T, WireError> {
    let mut body = frame;
    if body.starts_with(BOM) {
        body = &body[BOM.len()..];
    }
    while let [rest @ .., last] = body {
        if *last == b'\n' || *last == b'\r' {
            body = rest;
        } else {
            break;
        }
    }
    Ok(serde_json::from_slice(body)?)
}

/// Accumulates raw socket bytes and splits out complete frames.
///
/// Bytes after a terminator are retained for the next frame. The buffer
/// enforces a maximum frame length so a peer that never sends a newline
/// cannot grow memory without bound.
#[derive(Debug)]
pub struct FrameBuffer {
    buf: Vec<u8>,
    max_frame_len: usize,
}

impl FrameBuffer {
    pub fn new(max_frame_len: usize) -> Self {
        Self {
            buf: Vec::new(),
            max_frame_len,
        }
    }

    /// Append freshly-read bytes. Fails when the unterminated tail would
    /// exceed the frame cap.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > self.max_frame_len && !self.buf.contains(&b'\n') {
            return Err(WireError::FrameTooLarge {
                max: self.max_frame_len,
            });
        }
        Ok(())
    }

    /// Take the next complete frame (terminator included), if any.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let rest = self.buf.split_off(end + 1);
        let frame = std::mem::replace(&mut self.buf, rest);
        Some(frame)
    }

    /// Bytes currently buffered without a terminator.
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }
}
