//! Newline-delimited JSON framing.
//!
//! One message per line. `serde_json` escapes control characters inside
//! strings, so a serialized record never contains a raw `\n` and a frame
//! boundary can never split a record.
//!
//! A line that is too long or not UTF-8 is reported as a [`Frame`] of its
//! own. The codec skips past it, so the stream stays in sync and the reader
//! can answer the bad frame and keep going.

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{Decoder, FramedRead, FramedWrite, LinesCodec, LinesCodecError};
use tracing::{trace, warn};

use super::{TransportError, TransportResult};

/// One unit read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete line, without its terminator.
    Line(String),
    /// A line longer than the maximum frame length. Its bytes were dropped.
    TooLong,
    /// A line that is not valid UTF-8. Its bytes were dropped.
    InvalidUtf8,
}

/// `LinesCodec` with per-line failures turned into frames.
#[derive(Debug)]
struct FrameCodec {
    lines: LinesCodec,
}

impl FrameCodec {
    fn new(max_frame_length: usize) -> Self {
        Self {
            lines: LinesCodec::new_with_max_length(max_frame_length),
        }
    }

    fn classify(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<Frame>, LinesCodecError> {
        match result {
            Ok(line) => Ok(line.map(Frame::Line)),
            Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(Frame::TooLong)),
            // LinesCodec has already consumed the line when UTF-8 decoding fails.
            Err(LinesCodecError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                Ok(Some(Frame::InvalidUtf8))
            }
            Err(e) => Err(e),
        }
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Self::classify(self.lines.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Frame>, LinesCodecError> {
        Self::classify(self.lines.decode_eof(buf))
    }
}

/// A framed, bidirectional message channel over a reader/writer pair.
pub struct FramedTransport<R, W> {
    reader: FramedRead<R, FrameCodec>,
    writer: FramedWrite<W, LinesCodec>,
    max_frame_length: usize,
}

impl<R, W> FramedTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Wrap a reader/writer pair, rejecting incoming frames longer than
    /// `max_frame_length` bytes.
    pub fn new(reader: R, writer: W, max_frame_length: usize) -> Self {
        Self {
            reader: FramedRead::new(reader, FrameCodec::new(max_frame_length)),
            writer: FramedWrite::new(writer, LinesCodec::new()),
            max_frame_length,
        }
    }

    pub fn max_frame_length(&self) -> usize {
        self.max_frame_length
    }

    /// Serialize and write one message, flushing it to the peer.
    pub async fn send<T: Serialize>(&mut self, message: &T) -> TransportResult<()> {
        let line = serde_json::to_string(message)?;
        trace!(frame = %line, "-> frame");
        self.writer
            .send(line)
            .await
            .map_err(|e| TransportError::from_codec(e, self.max_frame_length))
    }

    /// Read the next frame, malformed ones included. `None` means the peer
    /// closed the stream.
    pub async fn recv_frame(&mut self) -> TransportResult<Option<Frame>> {
        match self.reader.next().await {
            Some(Ok(frame)) => {
                match &frame {
                    Frame::Line(line) => trace!(frame = %line, "<- frame"),
                    malformed => warn!("Malformed frame: {:?}", malformed),
                }
                Ok(Some(frame))
            }
            Some(Err(e)) => Err(TransportError::from_codec(e, self.max_frame_length)),
            None => Ok(None),
        }
    }

    /// Read the next well-formed line. `None` means the peer closed the
    /// stream; a malformed frame is an error.
    pub async fn recv(&mut self) -> TransportResult<Option<String>> {
        match self.recv_frame().await? {
            Some(Frame::Line(line)) => Ok(Some(line)),
            Some(Frame::TooLong) => Err(TransportError::FrameTooLong(self.max_frame_length)),
            Some(Frame::InvalidUtf8) => Err(TransportError::InvalidUtf8),
            None => Ok(None),
        }
    }
}
