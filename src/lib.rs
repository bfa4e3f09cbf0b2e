//! # promptwire
//!
//! A minimal TCP request/reply stack. Peers exchange length-prefixed
//! MessagePack frames carrying a two-field record (`text`, `num`); the server
//! composes each reply from operator input at its console, serialized across
//! all concurrently active connections.
//!
//! ## Architecture
//!
//! - **Protocol**: 4-byte big-endian length prefix + MsgPack payload
//! - **Sessions**: one tokio task per admitted connection, capped count
//! - **Reply source**: a dedicated arbiter thread owns the operator console;
//!   sessions request replies over a channel, served strictly one at a time
//!
//! ## Example
//!
//! ```ignore
//! use promptwire::console::ConsoleInput;
//! use promptwire::reply::spawn_reply_source;
//! use promptwire::server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (reply, _arbiter) = spawn_reply_source(ConsoleInput::new());
//!     let server = Server::bind(ServerConfig::default(), reply).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod console;
pub mod error;
pub mod message;
pub mod protocol;
pub mod reply;
pub mod server;
pub mod session;

pub use client::Client;
pub use error::{PromptwireError, Result};
pub use message::Message;
pub use server::{Server, ServerConfig};
