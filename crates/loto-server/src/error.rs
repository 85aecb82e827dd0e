//! Server-level error types.

use thiserror::Error;

use loto_core::StoreError;
use loto_proto::ProtocolError;

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Invalid bind address, listen backlog, or other startup configuration.
    /// Fatal — fix configuration and restart.
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport/network error (bind failure, accept failure, I/O error).
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A client sent malformed framing. Fatal for that connection only.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The bet-store adapter failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
