//! Protocol module - wire framing.
//!
//! One frame per logical exchange: a 4-byte big-endian length prefix followed
//! by exactly that many bytes of encoded payload.

mod wire;

pub use wire::{
    encode_frame, read_frame, write_frame, DEFAULT_MAX_PAYLOAD_SIZE, LEN_PREFIX_SIZE,
};
