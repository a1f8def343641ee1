//! The identity of a capsule owner or decrypt manager.

use crate::crypto::verifiable::Verifiable;
use dupe::Dupe;
use serde::{Deserialize, Serialize};

/// A unique identifier for a caller of the [`Vault`](crate::vault::Vault).
///
/// This is a newtype for a [`VerifyingKey`](ed25519_dalek::VerifyingKey).
/// Whoever holds the matching signing key can prove they are this identity to the
/// [`EncryptedValueService`](crate::service::EncryptedValueService), which is
/// what makes owner-scoped decryption possible.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct Identifier(pub ed25519_dalek::VerifyingKey);

impl Identifier {
    #[cfg(any(feature = "test_utils", test))]
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        ed25519_dalek::SigningKey::generate(csprng)
            .verifying_key()
            .into()
    }

    /// Lower the [`Identifier`] to an owned binary representation.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Lower the [`Identifier`] to a borrowed binary representation.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

#[cfg(any(test, feature = "arbitrary"))]
impl<'a> arbitrary::Arbitrary<'a> for Identifier {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let seed = <[u8; 32]>::arbitrary(u)?;
        Ok(ed25519_dalek::SigningKey::from_bytes(&seed)
            .verifying_key()
            .into())
    }
}

impl Dupe for Identifier {
    fn dupe(&self) -> Self {
        *self
    }
}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Identifier {}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

impl std::fmt::Debug for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Identifier({})", self)
    }
}

impl Verifiable for Identifier {
    fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.0
    }
}

impl From<ed25519_dalek::VerifyingKey> for Identifier {
    fn from(verifying_key: ed25519_dalek::VerifyingKey) -> Self {
        Self(verifying_key)
    }
}

impl From<&ed25519_dalek::VerifyingKey> for Identifier {
    fn from(verifying_key: &ed25519_dalek::VerifyingKey) -> Self {
        Self(*verifying_key)
    }
}

impl From<Identifier> for ed25519_dalek::VerifyingKey {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_prefixed_hex() {
        let id = Identifier::generate(&mut rand::thread_rng());
        let shown = id.to_string();
        assert!(shown.starts_with("0x"));
        assert_eq!(shown.len(), 2 + 64);
        assert_eq!(format!("{:?}", id), format!("Identifier({})", shown));
    }

    #[test]
    fn test_ordering_follows_bytes() {
        let mut csprng = rand::thread_rng();
        let a = Identifier::generate(&mut csprng);
        let b = Identifier::generate(&mut csprng);
        assert_eq!(a.cmp(&b), a.as_bytes().cmp(b.as_bytes()));
        assert_eq!(a, a.dupe());
    }
}
