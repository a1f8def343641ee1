//! Opaque references to encrypted values.

use super::digest::Digest;
use dupe::Dupe;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque 256-bit reference to an encrypted value.
///
/// The [`Vault`](crate::vault::Vault) never looks inside a handle: it is only
/// meaningful to the [`EncryptedValueService`](crate::service::EncryptedValueService)
/// that issued it.
#[derive(Copy, Clone, Dupe, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct CiphertextHandle(pub [u8; 32]);

impl CiphertextHandle {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for CiphertextHandle {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<CiphertextHandle> for [u8; 32] {
    fn from(handle: CiphertextHandle) -> Self {
        handle.0
    }
}

impl<T: Serialize> From<Digest<T>> for CiphertextHandle {
    fn from(digest: Digest<T>) -> Self {
        Self(digest.into())
    }
}

impl fmt::Display for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for CiphertextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextHandle({})", self)
    }
}
