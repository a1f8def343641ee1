//! The boundary to the external encrypted-value service.
//!
//! The vault never produces, verifies, or decrypts ciphertexts itself. It asks an
//! [`EncryptedValueService`] to _admit_ each submitted input, then _commits_ the
//! whole batch once every input has passed, and stores the durable handles.
//! Decryption happens entirely between the caller and the service, after
//! [`Vault::can_unlock`] says the lock has expired.
//!
//! [`Vault::can_unlock`]: crate::vault::Vault::can_unlock

pub mod memory;

use crate::{
    crypto::{
        handle::CiphertextHandle,
        signed::{Signed, VerificationError},
    },
    principal::{identifier::Identifier, vault_id::VaultId},
};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The statement a validity proof attests to: `handle` was produced for
/// `submitter` to store in `vault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputAttestation {
    pub vault: VaultId,
    pub submitter: Identifier,
    pub handle: CiphertextHandle,
}

/// A ciphertext handle paired with its validity proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiphertextInput {
    pub handle: CiphertextHandle,
    pub proof: Signed<InputAttestation>,
}

/// Who is asking for admission, and on whose behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionContext {
    /// The vault the input will be stored in.
    pub vault: VaultId,

    /// The caller creating the capsule; becomes its owner.
    pub submitter: Identifier,

    /// The vault's designated decrypt manager, who may also request decryption.
    pub decrypt_manager: Identifier,
}

/// The outcome of a successful [`EncryptedValueService::admit`].
///
/// Admission alone grants nothing. The service records access for `durable`
/// only when the admission is passed to [`EncryptedValueService::commit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Admission {
    /// The handle that was submitted.
    pub input: CiphertextHandle,

    /// The handle the vault should store.
    pub durable: CiphertextHandle,
}

/// A request to decrypt a durable handle, signed by the identity asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecryptRequest {
    pub handle: CiphertextHandle,
}

/// The narrow contract the vault relies on.
///
/// Implementations must be independently mockable; see
/// [`MemoryEncryptedValueService`](memory::MemoryEncryptedValueService) for a
/// complete in-process one.
// NOTE: we assume single-threaded async, so Send bounds are left off
#[allow(async_fn_in_trait)]
pub trait EncryptedValueService {
    /// Check that `input` was legitimately produced for this vault and submitter.
    ///
    /// Must not change any state the service exposes: a capsule whose later
    /// slot is rejected leaves no trace of its earlier ones.
    async fn admit(
        &self,
        input: &CiphertextInput,
        context: &AdmissionContext,
    ) -> Result<Admission, AdmissionError>;

    /// Record every admission of one capsule, granting read access to the
    /// submitter and the decrypt manager.
    ///
    /// Called once per capsule, after all of its inputs were admitted and
    /// immediately before the vault stores it.
    async fn commit(
        &self,
        admissions: &NonEmpty<Admission>,
        context: &AdmissionContext,
    ) -> Result<(), AdmissionError>;

    /// Decrypt a durable handle for an authorized requester.
    ///
    /// This is never called by the vault itself.
    async fn decrypt(
        &self,
        handle: &CiphertextHandle,
        request: &Signed<DecryptRequest>,
    ) -> Result<Vec<u8>, DecryptError>;
}

impl<T: EncryptedValueService> EncryptedValueService for &T {
    async fn admit(
        &self,
        input: &CiphertextInput,
        context: &AdmissionContext,
    ) -> Result<Admission, AdmissionError> {
        (*self).admit(input, context).await
    }

    async fn commit(
        &self,
        admissions: &NonEmpty<Admission>,
        context: &AdmissionContext,
    ) -> Result<(), AdmissionError> {
        (*self).commit(admissions, context).await
    }

    async fn decrypt(
        &self,
        handle: &CiphertextHandle,
        request: &Signed<DecryptRequest>,
    ) -> Result<Vec<u8>, DecryptError> {
        (*self).decrypt(handle, request).await
    }
}

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("Validity proof does not verify: {0}")]
    InvalidProof(#[from] VerificationError),

    #[error("Validity proof was not issued by a trusted attester: {0}")]
    UntrustedAttester(Identifier),

    #[error("Validity proof is for a different vault, submitter, or handle")]
    ContextMismatch,

    #[error("Unknown ciphertext: {0}")]
    UnknownCiphertext(CiphertextHandle),
}

#[derive(Debug, Error)]
pub enum DecryptError {
    #[error("Decryption request does not verify: {0}")]
    InvalidProof(#[from] VerificationError),

    #[error("Decryption request was signed for a different handle")]
    HandleMismatch,

    #[error("Handle was never admitted: {0}")]
    UnknownHandle(CiphertextHandle),

    #[error("{0} may not decrypt this handle")]
    Unauthorized(Identifier),

    #[error("Ciphertext failed to decrypt")]
    DecryptionFailed,
}
