//! The application-level record exchanged between peers.
//!
//! A [`Message`] carries a text value and a signed 32-bit integer. On the
//! wire it travels as a MessagePack map with field order `text`, `num`.
//!
//! # Text bound
//!
//! Both peers use the bounded variant: [`Message::new`] truncates the text to
//! [`MAX_TEXT_LEN`] bytes on a UTF-8 character boundary. Truncation is an
//! encoding-side contract only; decoding reports whatever the peer sent.

use serde::{Deserialize, Serialize};

/// Maximum text length in bytes.
pub const MAX_TEXT_LEN: usize = 255;

/// The unit of exchange: a text value and a 32-bit signed integer.
///
/// Field order is stable (`text`, then `num`) and preserved by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Text value, at most [`MAX_TEXT_LEN`] bytes when built via [`Message::new`].
    pub text: String,
    /// Signed 32-bit integer. No invariant links it to `text`.
    pub num: i32,
}

impl Message {
    /// Create a message, truncating over-length text to [`MAX_TEXT_LEN`] bytes.
    ///
    /// Truncation never splits a UTF-8 character.
    pub fn new(text: impl Into<String>, num: i32) -> Self {
        let mut text = text.into();
        if text.len() > MAX_TEXT_LEN {
            let cut = floor_char_boundary(&text, MAX_TEXT_LEN);
            text.truncate(cut);
        }
        Self { text, num }
    }
}

/// Largest index `<= max` that lies on a char boundary of `s`.
fn floor_char_boundary(s: &str, max: usize) -> usize {
    let mut idx = max.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}
