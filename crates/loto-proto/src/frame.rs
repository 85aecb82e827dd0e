//! Frame type combining header and body, plus the streaming codec
//! (`read_frame`/`write_frame`) that drives it over a socket.

use bytes::{BufMut, Bytes};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::errors::{ProtocolError, ReadFrameError, WriteFrameError};
use crate::header::FrameHeader;
use crate::message_type::MessageType;

/// A complete protocol frame: header plus body bytes.
///
/// Holds the raw body, not a decoded payload — payload decoding is a
/// separate step (`crate::payloads`) once the session handler knows which
/// message type it is dealing with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame header (5 bytes on the wire).
    pub header: FrameHeader,
    /// Raw body bytes.
    pub body: Bytes,
}

impl Frame {
    /// Build a frame, computing `header.body_length` from `body`.
    #[must_use]
    pub fn new(message_type: u8, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        #[allow(clippy::expect_used)]
        let len = u32::try_from(body.len())
            .expect("invariant: body length fits in u32 (bounded by the 8 KiB frame ceiling)");
        Self { header: FrameHeader::new(len, message_type), body }
    }

    /// Encode this frame (header + body) into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::BodyTooLarge`] if the body exceeds
    /// [`FrameHeader::MAX_BODY_LEN`].
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<(), ProtocolError> {
        if self.body.len() > FrameHeader::MAX_BODY_LEN as usize {
            return Err(ProtocolError::BodyTooLarge {
                size: self.body.len(),
                max: FrameHeader::MAX_BODY_LEN as usize,
            });
        }
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.body);
        Ok(())
    }

    /// Decode a frame from an in-memory buffer that already holds the full
    /// header and body (used by tests and by the batch envelope codec).
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the header is malformed/oversized or
    /// the buffer is shorter than the declared body length.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let header = FrameHeader::from_bytes(bytes)?;
        let body_len = header.body_length() as usize;
        let total = FrameHeader::SIZE + body_len;

        if bytes.len() < total {
            return Err(ProtocolError::FrameTooShort { expected: total, actual: bytes.len() });
        }

        Ok(Self { header, body: Bytes::copy_from_slice(&bytes[FrameHeader::SIZE..total]) })
    }
}

/// Read one frame off `stream`.
///
/// Reads exactly [`FrameHeader::SIZE`] header bytes; if the stream closes
/// before any header byte arrives, returns [`ReadFrameError::EndOfStream`].
/// If it closes mid-header or mid-body, or the declared body length exceeds
/// [`FrameHeader::MAX_BODY_LEN`], returns [`ReadFrameError::Protocol`] — an
/// oversized length is rejected without reading the body. A zero-length
/// body is valid.
pub async fn read_frame<R>(stream: &mut R) -> Result<(u8, Bytes), ReadFrameError>
where
    R: AsyncRead + Unpin,
{
    let mut header_buf = [0u8; FrameHeader::SIZE];
    let mut read = 0usize;
    while read < header_buf.len() {
        let n = stream
            .read(&mut header_buf[read..])
            .await
            .map_err(ReadFrameError::FatalIo)?;
        if n == 0 {
            if read == 0 {
                return Err(ReadFrameError::EndOfStream);
            }
            return Err(ReadFrameError::Protocol(ProtocolError::FrameTooShort {
                expected: header_buf.len(),
                actual: read,
            }));
        }
        read += n;
    }

    let header = FrameHeader::from_bytes(&header_buf)?;
    let body_len = header.body_length() as usize;

    let mut body = vec![0u8; body_len];
    stream.read_exact(&mut body).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ReadFrameError::Protocol(ProtocolError::FrameTooShort {
                expected: body_len,
                actual: 0,
            })
        } else {
            ReadFrameError::FatalIo(err)
        }
    })?;

    Ok((header.message_type_tag(), Bytes::from(body)))
}

/// Write one frame (`message_type`, `body`) to `stream` with short-write
/// retry until the full buffer is committed.
///
/// # Errors
///
/// Returns [`WriteFrameError::Protocol`] if `body` exceeds
/// [`FrameHeader::MAX_BODY_LEN`], or [`WriteFrameError::FatalIo`] if the
/// peer closes mid-write.
pub async fn write_frame<W>(
    stream: &mut W,
    message_type: MessageType,
    body: &[u8],
) -> Result<(), WriteFrameError>
where
    W: AsyncWrite + Unpin,
{
    let frame = Frame::new(message_type.to_tag(), Bytes::copy_from_slice(body));
    let mut wire = Vec::with_capacity(FrameHeader::SIZE + body.len());
    frame.encode(&mut wire)?;

    stream.write_all(&wire).await.map_err(WriteFrameError::FatalIo)?;
    stream.flush().await.map_err(WriteFrameError::FatalIo)?;
    Ok(())
}
