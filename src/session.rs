//! Per-connection session: receive frame, decode, compose reply, send frame.
//!
//! Each session owns its `TcpStream` exclusively and runs as one tokio task.
//! The only thing shared with other sessions is the [`ReplyHandle`]. Every
//! iteration is fully synchronous from the session's point of view: it
//! suspends on socket I/O and on the reply source, and never holds a message
//! across iterations.

use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::codec::MsgPackCodec;
use crate::error::{PromptwireError, Result};
use crate::message::Message;
use crate::protocol::{read_frame, write_frame};
use crate::reply::ReplyHandle;

/// One active connection's state.
pub struct Session {
    id: u64,
    stream: TcpStream,
    reply: ReplyHandle,
    max_payload: u32,
}

impl Session {
    /// Create a session over an admitted connection.
    pub fn new(id: u64, stream: TcpStream, reply: ReplyHandle, max_payload: u32) -> Self {
        Self {
            id,
            stream,
            reply,
            max_payload,
        }
    }

    /// Session identifier, monotonically assigned by the acceptor.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Run the request/reply loop until the peer closes or a failure occurs.
    ///
    /// Returns `Ok(())` on a clean peer close at a frame boundary.
    ///
    /// # Errors
    ///
    /// Transport failures and reply-source shutdown end the session with an
    /// error. A malformed payload does not: it is logged, the message
    /// discarded, and the session proceeds to its next receive cycle.
    pub async fn run(mut self) -> Result<()> {
        let (mut reader, mut writer) = self.stream.split();

        loop {
            let payload = match read_frame(&mut reader, self.max_payload).await? {
                Some(payload) => payload,
                None => {
                    info!(session = self.id, "peer closed connection");
                    return Ok(());
                }
            };

            let msg: Message = match MsgPackCodec::decode(&payload) {
                Ok(msg) => msg,
                Err(PromptwireError::MalformedPayload(e)) => {
                    warn!(session = self.id, error = %e, "discarding malformed payload");
                    continue;
                }
                Err(e) => return Err(e),
            };

            info!(session = self.id, num = msg.num, text = %msg.text, "received message");

            let reply = self.reply.next_reply(self.id).await?;
            let encoded = MsgPackCodec::encode(&reply)?;
            write_frame(&mut writer, &encoded).await?;
        }
    }
}
