//! TCP listener with admission control.
//!
//! The acceptor accepts connections, enforces the concurrent-session cap, and
//! spawns one task per admitted connection. Over-cap connections are dropped
//! immediately without a session; the peer observes connection closure and no
//! application-level rejection frame is sent.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::error::{PromptwireError, Result};
use crate::protocol::DEFAULT_MAX_PAYLOAD_SIZE;
use crate::reply::ReplyHandle;
use crate::session::Session;

/// Default listening endpoint.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default maximum number of concurrently active sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 10;

/// How long `run` waits for active sessions to drain after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Holds one admission slot; releases it on drop.
///
/// The decrement runs however the session task ends, so the counter
/// invariant survives even an unwinding task.
struct SessionSlot {
    active: Arc<AtomicUsize>,
}

impl Drop for SessionSlot {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen_addr: String,
    /// Maximum concurrently active sessions; further connections are dropped.
    pub max_sessions: usize,
    /// Maximum accepted payload length per frame.
    pub max_payload: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_payload: DEFAULT_MAX_PAYLOAD_SIZE,
        }
    }
}

/// Accepting server: listener, admission counter, session supervision.
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
    reply: ReplyHandle,
    active_sessions: Arc<AtomicUsize>,
    next_session_id: AtomicU64,
    shutdown_tx: broadcast::Sender<()>,
}

impl Server {
    /// Bind the listening endpoint.
    ///
    /// # Errors
    ///
    /// A bind failure is fatal to the whole process: it propagates to the
    /// caller, which is expected to report it and exit non-zero.
    pub async fn bind(config: ServerConfig, reply: ReplyHandle) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).await?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            listener,
            config,
            reply,
            active_sessions: Arc::new(AtomicUsize::new(0)),
            next_session_id: AtomicU64::new(1),
            shutdown_tx,
        })
    }

    /// The bound local address (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Current number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.active_sessions.load(Ordering::Relaxed)
    }

    /// Handle to signal the accept loop to stop.
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Run the accept loop until shutdown is signalled.
    ///
    /// The acceptor never waits on session work: each admitted connection is
    /// handed to its own task.
    ///
    /// # Errors
    ///
    /// An accept failure is fatal: it is reported and returned, and the
    /// caller is expected to exit non-zero. The loop never terminates
    /// otherwise, except on shutdown.
    pub async fn run(&self) -> Result<()> {
        info!(address = %self.config.listen_addr, max_sessions = self.config.max_sessions, "server listening");

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => self.admit(stream, addr),
                        Err(e) => {
                            error!(error = %e, "fatal accept error");
                            return Err(e.into());
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown signal received");
                    break;
                }
            }
        }

        self.drain().await;
        Ok(())
    }

    /// Admit or reject a newly accepted connection.
    fn admit(&self, stream: tokio::net::TcpStream, addr: SocketAddr) {
        let current = self.active_sessions.load(Ordering::Relaxed);
        if current >= self.config.max_sessions {
            warn!(
                peer = %addr,
                active = current,
                max = self.config.max_sessions,
                "connection rejected: session limit reached"
            );
            // Dropping the socket closes the connection; no rejection frame.
            return;
        }

        self.active_sessions.fetch_add(1, Ordering::Relaxed);
        let slot = SessionSlot {
            active: Arc::clone(&self.active_sessions),
        };
        let session_id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        debug!(peer = %addr, session = session_id, active = current + 1, "accepted connection");

        let session = Session::new(
            session_id,
            stream,
            self.reply.clone(),
            self.config.max_payload,
        );

        tokio::spawn(async move {
            let _slot = slot;
            match session.run().await {
                Ok(()) => {}
                Err(PromptwireError::ConnectionClosed) => {
                    warn!(peer = %addr, session = session_id, "peer closed mid-frame");
                }
                Err(e) => {
                    error!(peer = %addr, session = session_id, error = %e, "session error");
                }
            }
        });
    }

    /// Wait briefly for active sessions to finish after shutdown.
    async fn drain(&self) {
        let deadline = tokio::time::Instant::now() + DRAIN_TIMEOUT;
        loop {
            let active = self.active_sessions.load(Ordering::Relaxed);
            if active == 0 {
                return;
            }
            if tokio::time::Instant::now() >= deadline {
                warn!(active, "shutdown with sessions still active");
                return;
            }
            info!(active, "waiting for sessions to drain");
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}
