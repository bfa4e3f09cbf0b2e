//! Connecting peer: one frame out, one frame in.
//!
//! The exchange pattern is strictly synchronous request/reply: the client
//! sends a message and waits for the server's reply before sending again.

use tokio::net::TcpStream;

use crate::codec::MsgPackCodec;
use crate::error::{PromptwireError, Result};
use crate::message::Message;
use crate::protocol::{read_frame, write_frame, DEFAULT_MAX_PAYLOAD_SIZE};

/// A connected client.
pub struct Client {
    stream: TcpStream,
    max_payload: u32,
}

impl Client {
    /// Connect to a server.
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            max_payload: DEFAULT_MAX_PAYLOAD_SIZE,
        })
    }

    /// Send one message and wait for the reply.
    ///
    /// Returns `Ok(None)` if the server closed the connection before
    /// replying, which is how an admission rejection is observed.
    ///
    /// # Errors
    ///
    /// Transport failures and malformed reply payloads are errors; this peer
    /// has no reason to keep a connection whose replies it cannot read.
    pub async fn exchange(&mut self, msg: &Message) -> Result<Option<Message>> {
        let payload = MsgPackCodec::encode(msg)?;

        let (mut reader, mut writer) = self.stream.split();
        if let Err(e) = write_frame(&mut writer, &payload).await {
            // A rejected connection may surface as a write error (RST) rather
            // than a clean EOF; report it as "no reply" in either case.
            return match e {
                PromptwireError::Io(ref io)
                    if io.kind() == std::io::ErrorKind::BrokenPipe
                        || io.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    Ok(None)
                }
                other => Err(other),
            };
        }

        match read_frame(&mut reader, self.max_payload).await? {
            Some(reply) => Ok(Some(MsgPackCodec::decode(&reply)?)),
            None => Ok(None),
        }
    }
}
