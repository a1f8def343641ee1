use crate::{
    crypto::{
        signed::{Signed, SigningError},
        verifiable::Verifiable,
    },
    principal::identifier::Identifier,
};
use ed25519_dalek::Signer;
use serde::Serialize;
use std::fmt::Debug;

/// Synchronously produce [`Signed`] payloads.
pub trait SyncSigner: Verifiable {
    fn try_sign_bytes_sync(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError>;

    fn try_sign_sync<T: Serialize + Debug>(&self, payload: T) -> Result<Signed<T>, SigningError> {
        let payload_bytes: Vec<u8> = bincode::serialize(&payload)?;

        Ok(Signed {
            signature: self.try_sign_bytes_sync(payload_bytes.as_slice())?,
            issuer: self.verifying_key(),
            payload,
        })
    }

    /// The [`Identifier`] that signatures from this signer verify against.
    fn id(&self) -> Identifier {
        self.verifying_key().into()
    }
}

impl SyncSigner for ed25519_dalek::SigningKey {
    fn try_sign_bytes_sync(
        &self,
        payload_bytes: &[u8],
    ) -> Result<ed25519_dalek::Signature, SigningError> {
        self.try_sign(payload_bytes)
            .map_err(SigningError::SigningFailed)
    }
}
