use super::identifier::Identifier;
use dupe::Dupe;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The identity of a single [`Vault`](crate::vault::Vault) instance.
///
/// Validity proofs for ciphertext inputs are bound to one vault, so an input
/// prepared for one vault cannot be replayed into another.
#[derive(Copy, Dupe, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct VaultId(pub Identifier);

impl VaultId {
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        Self(
            ed25519_dalek::SigningKey::generate(csprng)
                .verifying_key()
                .into(),
        )
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl From<Identifier> for VaultId {
    fn from(id: Identifier) -> VaultId {
        VaultId(id)
    }
}

impl From<VaultId> for Identifier {
    fn from(id: VaultId) -> Identifier {
        id.0
    }
}

impl Debug for VaultId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "VaultId({})", self.0)
    }
}

impl Display for VaultId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
