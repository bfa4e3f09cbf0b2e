//! Error types for promptwire.

use thiserror::Error;

/// Main error type for all promptwire operations.
#[derive(Debug, Error)]
pub enum PromptwireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Payload bytes are not a valid encoding of the expected structure.
    ///
    /// Non-fatal to a session: the offending message is discarded and the
    /// session continues to its next receive cycle.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] rmp_serde::decode::Error),

    /// Framing violation (e.g. declared payload length exceeds the maximum).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Peer closed the connection in the middle of a frame.
    ///
    /// A clean close at a frame boundary is not an error; this variant covers
    /// EOF after a partial length prefix or a partial payload.
    #[error("connection closed mid-frame")]
    ConnectionClosed,

    /// The reply arbiter has shut down.
    #[error("reply source closed")]
    ReplySourceClosed,
}

/// Result type alias using PromptwireError.
pub type Result<T> = std::result::Result<T, PromptwireError>;
