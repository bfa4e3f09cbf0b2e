//! MsgPack codec using `rmp-serde`.
//!
//! Uses `to_vec_named` so structs are serialized as maps (with field names)
//! rather than positional arrays. Any peer that agrees on field names and
//! primitive types can decode the payload without a shared schema.
//!
//! # Example
//!
//! ```
//! use promptwire::codec::MsgPackCodec;
//! use promptwire::message::Message;
//!
//! let msg = Message::new("hello", 42);
//! let encoded = MsgPackCodec::encode(&msg).unwrap();
//! let decoded: Message = MsgPackCodec::decode(&encoded).unwrap();
//! assert_eq!(decoded, msg);
//! ```

use crate::error::Result;

/// MessagePack codec for structured payloads.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map format).
    ///
    /// # Errors
    ///
    /// Returns [`crate::PromptwireError::Encode`] if the value cannot be
    /// serialized. Never fails for a well-formed [`crate::message::Message`].
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PromptwireError::MalformedPayload`] if the bytes are
    /// not a valid encoding of `T` (wrong type tags, truncated payload,
    /// unexpected field count).
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}
