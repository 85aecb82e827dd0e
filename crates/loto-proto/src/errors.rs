//! Error kinds for every fallible operation in this crate.

use thiserror::Error;

/// Errors from parsing a frame header or its body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Fewer bytes were available than the header requires.
    #[error("frame too short: expected {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Bytes required.
        expected: usize,
        /// Bytes actually available.
        actual: usize,
    },

    /// The declared body length exceeds the frame ceiling.
    #[error("body too large: {size} bytes exceeds ceiling of {max} bytes")]
    BodyTooLarge {
        /// Declared body length.
        size: usize,
        /// The ceiling (8 KiB).
        max: usize,
    },
}

/// Outcome of `read_frame`: a decoded frame, a clean disconnect, or a
/// protocol violation (see `spec.md` §4.A / §7).
#[derive(Debug, Error)]
pub enum ReadFrameError {
    /// The peer closed the connection before sending a single header byte.
    /// Normal session termination, not logged as an error.
    #[error("end of stream")]
    EndOfStream,

    /// The peer closed mid-header, closed mid-body, sent an oversized
    /// length, or a transport-level I/O error occurred.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// An unrecoverable transport error other than a clean peer close.
    #[error("fatal I/O error: {0}")]
    FatalIo(#[source] std::io::Error),
}

/// Outcome of `write_frame`.
#[derive(Debug, Error)]
pub enum WriteFrameError {
    /// The caller tried to write a body over the frame ceiling.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The peer closed mid-write, or another unrecoverable transport error
    /// occurred.
    #[error("fatal I/O error: {0}")]
    FatalIo(#[source] std::io::Error),
}

/// Errors from decoding a message payload (the body of a frame).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// A bet payload was missing a required field or was not valid UTF-8.
    #[error("malformed bet: {0}")]
    MalformedBet(String),

    /// A batch envelope's inner framing was truncated or internally
    /// inconsistent, or it contained no terminal entry.
    #[error("malformed batch: {0}")]
    MalformedBatch(String),

    /// A `FinishedSending`/`WinnersRequest` body was not a single
    /// `AGENCY_ID=<value>` assignment.
    #[error("malformed agency id: {0}")]
    MalformedId(String),
}
