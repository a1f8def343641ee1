//! Wrap data in signatures.

use super::verifiable::Verifiable;
use crate::principal::identifier::Identifier;
use derivative::Derivative;
use ed25519_dalek::Verifier;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
};
use thiserror::Error;
use tracing::instrument;

/// A wrapper to add a signature and signer information to an arbitrary payload.
///
/// Validity proofs for ciphertext inputs and decryption requests are both
/// [`Signed`] payloads.
#[derive(Clone, Derivative, Serialize, Deserialize)]
#[derivative(Debug, PartialEq, Eq, Hash)]
pub struct Signed<T: Serialize + Debug> {
    /// The data that was signed.
    #[derivative(Hash = "ignore")]
    pub(crate) payload: T,

    /// The verifying key of the signer (for verifying the signature).
    #[derivative(Debug(format_with = "format_key"))]
    pub(crate) issuer: ed25519_dalek::VerifyingKey,

    /// The signature of the payload, which can be verified by the `issuer`.
    #[derivative(Hash(hash_with = "hash_signature"))]
    #[derivative(Debug(format_with = "format_sig"))]
    pub(crate) signature: ed25519_dalek::Signature,
}

fn format_sig(sig: &ed25519_dalek::Signature, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", hex::encode(sig.to_bytes()))
}

fn format_key(
    key: &ed25519_dalek::VerifyingKey,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    write!(f, "{}", hex::encode(key.as_bytes()))
}

fn hash_signature<H: Hasher>(signature: &ed25519_dalek::Signature, state: &mut H) {
    signature.to_bytes().hash(state);
}

impl<T: Serialize + Debug> Signed<T> {
    /// Getter for the payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Getter for the [`Identifier`] of the signer.
    pub fn id(&self) -> Identifier {
        self.verifying_key().into()
    }

    /// Getter for the verifying key of the signer.
    pub fn issuer(&self) -> &ed25519_dalek::VerifyingKey {
        &self.issuer
    }

    /// Getter for the signature.
    pub fn signature(&self) -> &ed25519_dalek::Signature {
        &self.signature
    }

    /// Verify the payload and signature against the issuer's verifying key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use capsule_vault::crypto::signer::{memory::MemorySigner, sync_signer::SyncSigner};
    /// #
    /// let signer = MemorySigner::generate(&mut rand::rngs::OsRng);
    /// let signed = signer.try_sign_sync("Open on my birthday").unwrap();
    /// assert!(signed.try_verify().is_ok());
    /// ```
    #[instrument(level = "trace")]
    pub fn try_verify(&self) -> Result<(), VerificationError> {
        let buf: Vec<u8> = bincode::serialize(&self.payload)?;
        Ok(self
            .verifying_key()
            .verify(buf.as_slice(), &self.signature)?)
    }
}

impl<T: Serialize + Debug> Verifiable for Signed<T> {
    fn verifying_key(&self) -> ed25519_dalek::VerifyingKey {
        self.issuer
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(#[from] signature::Error),

    #[error("Payload deserialization failed: {0}")]
    SerializationFailed(#[from] bincode::Error),
}

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Signing failed: {0}")]
    SigningFailed(#[from] ed25519_dalek::SignatureError),

    #[error("Payload serialization failed: {0}")]
    SerializationFailed(#[from] bincode::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signer::{memory::MemorySigner, sync_signer::SyncSigner};

    #[test]
    fn test_tampered_payload_fails() {
        let signer = MemorySigner::generate(&mut rand::thread_rng());
        let mut signed = signer.try_sign_sync(42u64).unwrap();
        signed.payload = 43;
        assert!(matches!(
            signed.try_verify(),
            Err(VerificationError::SignatureVerificationFailed(_))
        ));
    }

    #[test]
    fn test_id_is_signer() {
        let signer = MemorySigner::generate(&mut rand::thread_rng());
        let signed = signer.try_sign_sync(vec![1u8, 2, 3]).unwrap();
        assert_eq!(signed.id(), signer.id());
    }
}
