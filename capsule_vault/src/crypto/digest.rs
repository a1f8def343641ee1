//! Helpers for working with hashes.

use super::domain_separator::SEPARATOR;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// A [`blake3::Hash`] tagged with which type it is a hash of.
///
/// This makes it easy to trace the origin type of hash identifiers flowing through the system.
///
/// # Examples
///
/// ```
/// # use capsule_vault::crypto::digest::Digest;
/// #
/// let string_hash: Digest<String> = Digest::hash(&"hello world".to_string());
/// let bytes_hash: Digest<Vec<u8>> = Digest::hash(&vec![42, 99]);
/// assert_eq!(string_hash.as_slice().len(), 32);
/// assert_ne!(string_hash.as_slice(), bytes_hash.as_slice());
/// ```
#[derive(Debug)]
pub struct Digest<T: Serialize> {
    /// The underlying, unparameterized [`blake3::Hash`].
    pub raw: blake3::Hash,

    _phantom: PhantomData<T>,
}

impl<T: Serialize> Digest<T> {
    /// Digest a value and retain its type as a phantom parameter.
    ///
    /// The preimage is serialized with [`bincode`] and hashed under the
    /// crate's domain separator.
    pub fn hash(preimage: &T) -> Self {
        let bytes: Vec<u8> = bincode::serialize(&preimage).expect("unable to serialize to bytes");

        let mut hasher = blake3::Hasher::new();
        hasher.update(SEPARATOR);
        hasher.update(bytes.as_slice());

        Self {
            raw: hasher.finalize(),
            _phantom: PhantomData,
        }
    }

    /// Get the hash as a byte slice.
    pub fn as_slice(&self) -> &[u8] {
        self.raw.as_bytes()
    }

    /// Get the hash as a fixed-size byte array.
    pub fn to_bytes(&self) -> [u8; 32] {
        *self.raw.as_bytes()
    }
}

impl<T: Serialize> Serialize for Digest<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.raw.as_bytes().serialize(serializer)
    }
}

impl<'de, T: Serialize> Deserialize<'de> for Digest<T> {
    fn deserialize<D>(deserializer: D) -> Result<Digest<T>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: [u8; 32] = Deserialize::deserialize(deserializer)?;
        Ok(bytes.into())
    }
}

impl<T: Serialize> fmt::Display for Digest<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Digest({})", self.raw.to_hex())
    }
}

impl<T: Serialize> Copy for Digest<T> {}

impl<T: Serialize> Clone for Digest<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Serialize> PartialEq for Digest<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.as_bytes() == other.raw.as_bytes()
    }
}

impl<T: Serialize> Eq for Digest<T> {}

impl<T: Serialize> Hash for Digest<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state)
    }
}

impl<T: Serialize> From<[u8; 32]> for Digest<T> {
    fn from(bytes: [u8; 32]) -> Self {
        Self {
            raw: blake3::Hash::from(bytes),
            _phantom: PhantomData,
        }
    }
}

impl<T: Serialize> From<Digest<T>> for [u8; 32] {
    fn from(hash: Digest<T>) -> [u8; 32] {
        hash.raw.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_domain_separated() {
        let digest = Digest::hash(&vec![1u8, 2, 3]);
        let plain = blake3::hash(&bincode::serialize(&vec![1u8, 2, 3]).unwrap());
        assert_ne!(digest.as_slice(), plain.as_bytes());
    }

    #[test]
    fn test_serde_as_raw_bytes() {
        let digest: Digest<String> = Digest::hash(&"capsule".to_string());
        let bytes = bincode::serialize(&digest).unwrap();
        let back: Digest<String> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(digest, back);
    }
}
