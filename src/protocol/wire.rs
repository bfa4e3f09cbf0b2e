//! Wire framing: length-prefixed payloads on a byte stream.
//!
//! ```text
//! ┌───────────┬──────────────────┐
//! │ Length    │ Payload          │
//! │ 4 bytes   │ `length` bytes   │
//! │ uint32 BE │ MsgPack-encoded  │
//! └───────────┴──────────────────┘
//! ```
//!
//! Receiving is two ordered steps: read the prefix fully, then read exactly
//! `length` payload bytes. Short reads are retried at the socket level
//! (`read_exact`), never surfaced as corrupt data.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{PromptwireError, Result};

/// Length prefix size in bytes (fixed, exactly 4).
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default maximum payload size (64 KiB).
///
/// A two-field record never comes close; anything larger is a framing
/// violation, not a legitimate message.
pub const DEFAULT_MAX_PAYLOAD_SIZE: u32 = 64 * 1024;

/// Build a complete frame: big-endian length prefix followed by the payload.
///
/// The prefix always equals the exact byte length of the payload.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(LEN_PREFIX_SIZE + payload.len());
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Read one complete frame, returning its payload.
///
/// Returns `Ok(None)` when the peer closed cleanly at a frame boundary (EOF
/// before any prefix byte arrived).
///
/// # Errors
///
/// - [`PromptwireError::ConnectionClosed`] if the peer closed after a partial
///   prefix or before the full declared payload arrived.
/// - [`PromptwireError::Protocol`] if the declared length exceeds `max_payload`.
/// - [`PromptwireError::Io`] for other socket-level failures.
pub async fn read_frame<R>(reader: &mut R, max_payload: u32) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LEN_PREFIX_SIZE];

    // First read distinguishes a clean close (EOF at a frame boundary) from
    // a close mid-frame.
    let n = reader.read(&mut prefix).await?;
    if n == 0 {
        return Ok(None);
    }
    if n < LEN_PREFIX_SIZE {
        read_fully(reader, &mut prefix[n..]).await?;
    }

    let len = u32::from_be_bytes(prefix);
    if len > max_payload {
        return Err(PromptwireError::Protocol(format!(
            "declared payload length {} exceeds maximum {}",
            len, max_payload
        )));
    }

    let mut payload = BytesMut::zeroed(len as usize);
    read_fully(reader, &mut payload).await?;
    Ok(Some(payload.freeze()))
}

/// Write one complete frame (prefix, then payload) and flush.
///
/// # Errors
///
/// Returns [`PromptwireError::Io`] on a short or failed write.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(&(payload.len() as u32).to_be_bytes())
        .await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// `read_exact` that maps EOF to [`PromptwireError::ConnectionClosed`].
async fn read_fully<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    reader.read_exact(buf).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            PromptwireError::ConnectionClosed
        } else {
            PromptwireError::Io(e)
        }
    })?;
    Ok(())
}
