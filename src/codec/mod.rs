//! Codec module - serialization/deserialization for frame payloads.
//!
//! [`MsgPackCodec`] encodes payloads as MessagePack using `rmp-serde`. Structs
//! are serialized as maps (`to_vec_named`), so field names travel on the wire
//! and the payload stays self-describing for non-Rust peers.
//!
//! The codec is a marker struct with static methods rather than a trait
//! object, so codec selection happens at compile time.

mod msgpack;

pub use msgpack::MsgPackCodec;
