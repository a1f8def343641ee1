//! Nonce-misuse resistant initialization vector.

use super::{domain_separator::SEPARATOR, symmetric_key::SymmetricKey};
use crate::principal::{identifier::Identifier, vault_id::VaultId};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Deterministic 24-byte XChaCha nonce.
///
/// Derived with BLAKE3 from the key, the plaintext, the vault the value is
/// encrypted for and the submitter. Two distinct values never share a nonce
/// under the same key, and the nonce can be recomputed to check integrity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct Siv([u8; 24]);

impl Siv {
    pub fn new(
        key: &SymmetricKey,
        plaintext: &[u8],
        vault_id: VaultId,
        submitter: Identifier,
    ) -> Result<Self, std::io::Error> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(SEPARATOR);
        hasher.update(vault_id.as_bytes());
        hasher.update(submitter.as_bytes());
        hasher.update(key.as_slice());
        hasher.update(plaintext);

        let mut buf = [0; 24];
        hasher.finalize_xof().read_exact(&mut buf)?;

        Ok(Siv(buf))
    }

    /// Convert to a [`chacha20poly1305::XNonce`].
    pub fn as_xnonce(&self) -> &chacha20poly1305::XNonce {
        chacha20poly1305::XNonce::from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 24] {
        &self.0
    }
}

impl From<[u8; 24]> for Siv {
    fn from(arr: [u8; 24]) -> Self {
        Siv(arr)
    }
}
