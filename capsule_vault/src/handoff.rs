//! Handing stored handles over for decryption.

use crate::{
    capsule::id::CapsuleId,
    crypto::{
        handle::CiphertextHandle,
        signed::{Signed, SigningError},
        signer::sync_signer::SyncSigner,
    },
    principal::identifier::Identifier,
    service::DecryptRequest,
    time::TimeRemaining,
};
use nonempty::NonEmpty;
use thiserror::Error;

/// Everything a requester needs to ask the
/// [`EncryptedValueService`](crate::service::EncryptedValueService) to decrypt a capsule.
///
/// Only produced for unlockable capsules, and only for the owner or the
/// vault's decrypt manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionHandoff {
    pub capsule_id: CapsuleId,
    pub owner: Identifier,
    pub requester: Identifier,
    pub handles: NonEmpty<CiphertextHandle>,
}

impl DecryptionHandoff {
    /// Sign one [`DecryptRequest`] per handle, in slot order.
    pub fn sign_requests<S: SyncSigner>(
        &self,
        signer: &S,
    ) -> Result<NonEmpty<(CiphertextHandle, Signed<DecryptRequest>)>, SigningError> {
        let head = self.handles.head;
        let mut requests = NonEmpty::new((
            head,
            signer.try_sign_sync(DecryptRequest { handle: head })?,
        ));
        for handle in self.handles.tail.iter().copied() {
            requests.push((handle, signer.try_sign_sync(DecryptRequest { handle })?));
        }

        Ok(requests)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandoffError {
    #[error("Capsule {0} does not exist")]
    NotFound(CapsuleId),

    #[error("Capsule {id} is still locked for {remaining}")]
    StillLocked {
        id: CapsuleId,
        remaining: TimeRemaining,
    },

    #[error("{requester} is neither the owner of capsule {id} nor the decrypt manager")]
    Unauthorized { id: CapsuleId, requester: Identifier },
}
