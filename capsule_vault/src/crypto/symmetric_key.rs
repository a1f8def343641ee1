//! Symmetric cipher newtype.

use super::{domain_separator::SEPARATOR, siv::Siv};
use chacha20poly1305::{AeadInPlace, KeyInit, XChaCha20Poly1305};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Newtype wrapper around an XChaCha20-Poly1305 key that's serializable.
///
/// # Example
///
/// ```
/// # use capsule_vault::{
/// #     crypto::{siv::Siv, symmetric_key::SymmetricKey},
/// #     principal::{identifier::Identifier, vault_id::VaultId},
/// # };
/// let mut csprng = rand::rngs::OsRng;
/// let plaintext = b"see you in ten years";
///
/// let vault_id = VaultId::generate(&mut csprng);
/// let submitter = Identifier::from(ed25519_dalek::SigningKey::generate(&mut csprng).verifying_key());
///
/// let key = SymmetricKey::generate(&mut csprng);
/// let nonce = Siv::new(&key, plaintext, vault_id, submitter).unwrap();
///
/// let mut buf = plaintext.to_vec();
/// key.try_encrypt(nonce, &mut buf).unwrap();
/// assert_ne!(buf.as_slice(), plaintext);
///
/// key.try_decrypt(nonce, &mut buf).unwrap();
/// assert_eq!(buf.as_slice(), plaintext);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymmetricKey([u8; 32]);

impl SymmetricKey {
    /// Get the key as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Generate a new random symmetric key.
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        let mut key = [0u8; 32];
        csprng.fill_bytes(&mut key);
        Self(key)
    }

    /// Convert into an [`XChaCha20Poly1305`] key.
    pub fn to_xchacha(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(&self.0.into())
    }

    /// Encrypt data in place.
    #[instrument(skip_all)]
    pub fn try_encrypt(
        &self,
        nonce: Siv,
        data: &mut Vec<u8>,
    ) -> Result<(), chacha20poly1305::Error> {
        self.to_xchacha()
            .encrypt_in_place(nonce.as_xnonce(), SEPARATOR, data)
    }

    /// Decrypt data in place.
    #[instrument(skip_all)]
    pub fn try_decrypt(
        &self,
        nonce: Siv,
        data: &mut Vec<u8>,
    ) -> Result<(), chacha20poly1305::Error> {
        self.to_xchacha()
            .decrypt_in_place(nonce.as_xnonce(), SEPARATOR, data)
    }
}

impl From<[u8; 32]> for SymmetricKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<SymmetricKey>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::{identifier::Identifier, vault_id::VaultId};

    #[test]
    fn test_wrong_key_fails() {
        let mut csprng = rand::thread_rng();
        let vault_id = VaultId::generate(&mut csprng);
        let submitter = Identifier::generate(&mut csprng);

        let key = SymmetricKey::generate(&mut csprng);
        let other = SymmetricKey::generate(&mut csprng);
        let nonce = Siv::new(&key, b"secret", vault_id, submitter).unwrap();

        let mut buf = b"secret".to_vec();
        key.try_encrypt(nonce, &mut buf).unwrap();
        assert!(other.try_decrypt(nonce, &mut buf).is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = SymmetricKey::generate(&mut rand::thread_rng());
        assert_eq!(format!("{:?}", key), "<SymmetricKey>");
    }
}
