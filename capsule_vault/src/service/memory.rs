//! An in-process [`EncryptedValueService`].

use super::{
    Admission, AdmissionContext, AdmissionError, CiphertextInput, DecryptError, DecryptRequest,
    EncryptedValueService, InputAttestation,
};
use crate::{
    crypto::{
        digest::Digest,
        handle::CiphertextHandle,
        signed::{Signed, SigningError},
        signer::{memory::MemorySigner, sync_signer::SyncSigner},
        siv::Siv,
        symmetric_key::SymmetricKey,
    },
    principal::{identifier::Identifier, vault_id::VaultId},
};
use dupe::Dupe;
use futures::lock::Mutex;
use nonempty::NonEmpty;
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};
use thiserror::Error;
use tracing::instrument;

/// Encrypts values, attests them, admits them, and decrypts them for their readers.
///
/// Plaintexts are sealed with XChaCha20-Poly1305 under a single service key.
/// Validity proofs are Ed25519 signatures by the service's attester key over an
/// [`InputAttestation`]. Admission is a pure check; once a capsule's inputs are
/// committed, each durable handle carries an access list holding the submitter
/// and the vault's decrypt manager, and only requests signed by one of them are
/// decrypted.
///
/// Clones share state, so a test can hand one to a [`Vault`](crate::vault::Vault)
/// and keep another for encrypting and decrypting.
#[derive(Debug, Clone)]
pub struct MemoryEncryptedValueService {
    attester: MemorySigner,
    key: SymmetricKey,
    state: Arc<Mutex<ServiceState>>,
}

#[derive(Debug, Default)]
struct ServiceState {
    sealed: HashMap<CiphertextHandle, Sealed>,
    admitted: HashMap<CiphertextHandle, Admitted>,
}

#[derive(Debug, Clone)]
struct Sealed {
    nonce: Siv,
    ciphertext: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Admitted {
    source: CiphertextHandle,
    readers: BTreeSet<Identifier>,
}

impl MemoryEncryptedValueService {
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(csprng: &mut R) -> Self {
        Self {
            attester: MemorySigner::generate(csprng),
            key: SymmetricKey::generate(csprng),
            state: Arc::new(Mutex::new(ServiceState::default())),
        }
    }

    /// The identity whose signatures make a validity proof acceptable.
    pub fn attester(&self) -> Identifier {
        self.attester.id()
    }

    /// Encrypt `plaintext` as an input that `submitter` may store in `vault`.
    #[instrument(skip(self, plaintext), fields(len = plaintext.len()))]
    pub async fn encrypt(
        &self,
        vault: VaultId,
        submitter: Identifier,
        plaintext: &[u8],
    ) -> Result<CiphertextInput, EncryptError> {
        let nonce = Siv::new(&self.key, plaintext, vault, submitter)?;
        let mut ciphertext = plaintext.to_vec();
        self.key
            .try_encrypt(nonce, &mut ciphertext)
            .map_err(|_| EncryptError::EncryptionFailed)?;

        let handle: CiphertextHandle = Digest::hash(&(nonce, &ciphertext)).into();
        let proof = self.attester.try_sign_sync(InputAttestation {
            vault,
            submitter,
            handle,
        })?;

        self.state
            .lock()
            .await
            .sealed
            .insert(handle, Sealed { nonce, ciphertext });

        Ok(CiphertextInput { handle, proof })
    }

    /// Whether `who` is on the access list of a committed handle.
    pub async fn is_reader(&self, handle: &CiphertextHandle, who: &Identifier) -> bool {
        self.state
            .lock()
            .await
            .admitted
            .get(handle)
            .is_some_and(|admitted| admitted.readers.contains(who))
    }

    /// Number of durable handles committed so far.
    pub async fn admitted_count(&self) -> usize {
        self.state.lock().await.admitted.len()
    }
}

impl Dupe for MemoryEncryptedValueService {
    fn dupe(&self) -> Self {
        self.clone()
    }
}

impl EncryptedValueService for MemoryEncryptedValueService {
    #[instrument(skip(self, input), fields(handle = %input.handle))]
    async fn admit(
        &self,
        input: &CiphertextInput,
        context: &AdmissionContext,
    ) -> Result<Admission, AdmissionError> {
        input.proof.try_verify()?;

        let issuer = input.proof.id();
        if issuer != self.attester() {
            return Err(AdmissionError::UntrustedAttester(issuer));
        }

        let expected = InputAttestation {
            vault: context.vault,
            submitter: context.submitter,
            handle: input.handle,
        };
        if *input.proof.payload() != expected {
            return Err(AdmissionError::ContextMismatch);
        }

        if !self.state.lock().await.sealed.contains_key(&input.handle) {
            return Err(AdmissionError::UnknownCiphertext(input.handle));
        }

        Ok(Admission {
            input: input.handle,
            durable: Digest::hash(&(context.vault, input.handle)).into(),
        })
    }

    #[instrument(skip(self, admissions), fields(slots = admissions.len()))]
    async fn commit(
        &self,
        admissions: &NonEmpty<Admission>,
        context: &AdmissionContext,
    ) -> Result<(), AdmissionError> {
        let mut state = self.state.lock().await;

        // All or nothing: check the whole batch before granting anything
        for admission in admissions.iter() {
            if !state.sealed.contains_key(&admission.input) {
                return Err(AdmissionError::UnknownCiphertext(admission.input));
            }
        }

        for admission in admissions.iter() {
            state
                .admitted
                .entry(admission.durable)
                .or_insert_with(|| Admitted {
                    source: admission.input,
                    readers: BTreeSet::new(),
                })
                .readers
                .extend([context.submitter, context.decrypt_manager]);
        }

        Ok(())
    }

    #[instrument(skip(self, request), fields(requester = %request.id()))]
    async fn decrypt(
        &self,
        handle: &CiphertextHandle,
        request: &Signed<DecryptRequest>,
    ) -> Result<Vec<u8>, DecryptError> {
        request.try_verify()?;

        if request.payload().handle != *handle {
            return Err(DecryptError::HandleMismatch);
        }

        let state = self.state.lock().await;
        let admitted = state
            .admitted
            .get(handle)
            .ok_or(DecryptError::UnknownHandle(*handle))?;

        let requester = request.id();
        if !admitted.readers.contains(&requester) {
            return Err(DecryptError::Unauthorized(requester));
        }

        let sealed = state
            .sealed
            .get(&admitted.source)
            .ok_or(DecryptError::UnknownHandle(*handle))?;

        let mut buf = sealed.ciphertext.clone();
        self.key
            .try_decrypt(sealed.nonce, &mut buf)
            .map_err(|_| DecryptError::DecryptionFailed)?;

        Ok(buf)
    }
}

#[derive(Debug, Error)]
pub enum EncryptError {
    #[error("Unable to derive nonce: {0}")]
    NonceDerivation(#[from] std::io::Error),

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error(transparent)]
    Signing(#[from] SigningError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonempty::nonempty;

    struct Fixture {
        service: MemoryEncryptedValueService,
        vault: VaultId,
        alice: MemorySigner,
        manager: MemorySigner,
    }

    fn setup() -> Fixture {
        let mut csprng = rand::thread_rng();
        Fixture {
            service: MemoryEncryptedValueService::generate(&mut csprng),
            vault: VaultId::generate(&mut csprng),
            alice: MemorySigner::generate(&mut csprng),
            manager: MemorySigner::generate(&mut csprng),
        }
    }

    impl Fixture {
        fn context(&self) -> AdmissionContext {
            AdmissionContext {
                vault: self.vault,
                submitter: self.alice.id(),
                decrypt_manager: self.manager.id(),
            }
        }

        async fn store(&self, plaintext: &[u8]) -> CiphertextHandle {
            let input = self
                .service
                .encrypt(self.vault, self.alice.id(), plaintext)
                .await
                .unwrap();
            let admission = self.service.admit(&input, &self.context()).await.unwrap();
            self.service
                .commit(&nonempty![admission], &self.context())
                .await
                .unwrap();
            admission.durable
        }
    }

    #[tokio::test]
    async fn test_commit_then_decrypt_by_owner_and_manager() {
        let fx = setup();
        let durable = fx.store(b"Hello").await;

        for who in [&fx.alice, &fx.manager] {
            let request = who.try_sign_sync(DecryptRequest { handle: durable }).unwrap();
            let plaintext = fx.service.decrypt(&durable, &request).await.unwrap();
            assert_eq!(plaintext, b"Hello");
        }
    }

    #[tokio::test]
    async fn test_durable_handle_differs_from_input() {
        let fx = setup();
        let input = fx
            .service
            .encrypt(fx.vault, fx.alice.id(), b"Hello")
            .await
            .unwrap();
        let admission = fx.service.admit(&input, &fx.context()).await.unwrap();
        assert_eq!(admission.input, input.handle);
        assert_ne!(admission.durable, input.handle);
    }

    #[tokio::test]
    async fn test_admission_without_commit_grants_nothing() {
        let fx = setup();
        let input = fx
            .service
            .encrypt(fx.vault, fx.alice.id(), b"ok")
            .await
            .unwrap();
        let admission = fx.service.admit(&input, &fx.context()).await.unwrap();

        assert_eq!(fx.service.admitted_count().await, 0);
        assert!(!fx.service.is_reader(&admission.durable, &fx.manager.id()).await);

        let request = fx
            .manager
            .try_sign_sync(DecryptRequest {
                handle: admission.durable,
            })
            .unwrap();
        assert!(matches!(
            fx.service.decrypt(&admission.durable, &request).await,
            Err(DecryptError::UnknownHandle(_))
        ));
    }

    #[tokio::test]
    async fn test_commit_with_unknown_input_grants_nothing() {
        let fx = setup();
        let input = fx
            .service
            .encrypt(fx.vault, fx.alice.id(), b"real")
            .await
            .unwrap();
        let real = fx.service.admit(&input, &fx.context()).await.unwrap();
        let bogus = Admission {
            input: CiphertextHandle([3; 32]),
            durable: CiphertextHandle([4; 32]),
        };

        assert!(matches!(
            fx.service.commit(&nonempty![real, bogus], &fx.context()).await,
            Err(AdmissionError::UnknownCiphertext(handle)) if handle == bogus.input
        ));
        assert_eq!(fx.service.admitted_count().await, 0);
    }

    #[tokio::test]
    async fn test_stranger_cannot_decrypt() {
        let fx = setup();
        let durable = fx.store(b"secret").await;

        let eve = MemorySigner::generate(&mut rand::thread_rng());
        let request = eve.try_sign_sync(DecryptRequest { handle: durable }).unwrap();
        assert!(matches!(
            fx.service.decrypt(&durable, &request).await,
            Err(DecryptError::Unauthorized(id)) if id == eve.id()
        ));
    }

    #[tokio::test]
    async fn test_input_for_other_submitter_is_rejected() {
        let fx = setup();
        let bob = Identifier::generate(&mut rand::thread_rng());
        let input = fx.service.encrypt(fx.vault, bob, b"nope").await.unwrap();

        assert!(matches!(
            fx.service.admit(&input, &fx.context()).await,
            Err(AdmissionError::ContextMismatch)
        ));
    }

    #[tokio::test]
    async fn test_self_signed_proof_is_untrusted() {
        let fx = setup();
        let handle = CiphertextHandle([9; 32]);
        let proof = fx
            .alice
            .try_sign_sync(InputAttestation {
                vault: fx.vault,
                submitter: fx.alice.id(),
                handle,
            })
            .unwrap();

        assert!(matches!(
            fx.service
                .admit(&CiphertextInput { handle, proof }, &fx.context())
                .await,
            Err(AdmissionError::UntrustedAttester(id)) if id == fx.alice.id()
        ));
    }

    #[tokio::test]
    async fn test_request_for_other_handle_is_rejected() {
        let fx = setup();
        let durable = fx.store(b"one").await;
        let request = fx
            .alice
            .try_sign_sync(DecryptRequest {
                handle: CiphertextHandle([0; 32]),
            })
            .unwrap();

        assert!(matches!(
            fx.service.decrypt(&durable, &request).await,
            Err(DecryptError::HandleMismatch)
        ));
    }
}
