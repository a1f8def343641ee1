//! Packing short text messages into fixed-width payload slots.
//!
//! Each slot is a 32-bit word. Up to four message bytes are packed big-endian
//! into a word; a slot that receives fewer than four bytes keeps them in its low
//! bytes. Decoding drops zero bytes, so messages cannot contain NUL.

use thiserror::Error;

/// Bytes carried by one slot.
pub const SLOT_WIDTH: usize = 4;

/// Pack `message` into exactly `slots` words.
///
/// # Examples
///
/// ```
/// # use capsule_vault::message::{decode_message, encode_message};
/// let words = encode_message("Hello", 2).unwrap();
/// assert_eq!(words, vec![0x4865_6c6c, 0x6f]);
/// assert_eq!(decode_message(&words), "Hello");
/// ```
pub fn encode_message(message: &str, slots: usize) -> Result<Vec<u32>, MessageError> {
    let bytes = message.as_bytes();
    let capacity = slots.saturating_mul(SLOT_WIDTH);
    if bytes.len() > capacity {
        return Err(MessageError::TooLong {
            len: bytes.len(),
            capacity,
        });
    }

    if bytes.contains(&0) {
        return Err(MessageError::ContainsNul);
    }

    let mut words: Vec<u32> = bytes
        .chunks(SLOT_WIDTH)
        .map(|chunk| chunk.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
        .collect();
    words.resize(slots, 0);

    Ok(words)
}

/// Unpack words produced by [`encode_message`].
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn decode_message(words: &[u32]) -> String {
    let bytes: Vec<u8> = words
        .iter()
        .flat_map(|word| word.to_be_bytes())
        .filter(|b| *b != 0)
        .collect();

    String::from_utf8_lossy(&bytes).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("Message is {len} bytes but only {capacity} fit")]
    TooLong { len: usize, capacity: usize },

    #[error("Message contains a NUL byte")]
    ContainsNul,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_is_right_aligned() {
        assert_eq!(encode_message("Hi", 2).unwrap(), vec![0x4869, 0]);
    }

    #[test]
    fn test_full_capacity() {
        let words = encode_message("Cap1Cap2", 2).unwrap();
        assert_eq!(words, vec![0x4361_7031, 0x4361_7032]);
        assert_eq!(decode_message(&words), "Cap1Cap2");
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            encode_message("123456789", 2),
            Err(MessageError::TooLong {
                len: 9,
                capacity: 8
            })
        );
    }

    #[test]
    fn test_nul_rejected() {
        assert_eq!(encode_message("a\0b", 2), Err(MessageError::ContainsNul));
    }

    #[test]
    fn test_empty_message() {
        let words = encode_message("", 2).unwrap();
        assert_eq!(words, vec![0, 0]);
        assert_eq!(decode_message(&words), "");
    }

    #[test]
    fn test_multibyte_utf8_survives() {
        let words = encode_message("héé", 2).unwrap();
        assert_eq!(decode_message(&words), "héé");
    }
}
