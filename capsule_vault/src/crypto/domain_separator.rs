//! Constants for domain separation

/// The domain separator string for the capsule vault: `/capsule-vault/`.
pub const SEPARATOR_STR: &str = "/capsule-vault/";

/// The same separator as in [`SEPARATOR_STR`], represented as bytes.
pub const SEPARATOR: &[u8] = SEPARATOR_STR.as_bytes();
