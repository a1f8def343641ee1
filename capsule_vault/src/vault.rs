//! The primary API for the library.

use crate::{
    archive::{TryFromArchiveError, VaultArchive},
    capsule::{id::CapsuleId, Capsule, CapsuleSlot},
    config::VaultConfig,
    event::CapsuleCreated,
    handoff::{DecryptionHandoff, HandoffError},
    listener::{capsule::CapsuleListener, no_listener::NoListener},
    principal::{identifier::Identifier, vault_id::VaultId},
    service::{
        Admission, AdmissionContext, AdmissionError, CiphertextInput, EncryptedValueService,
    },
    time::{
        clock::{Clock, SystemClock},
        TimeRemaining, UnixTimestamp,
    },
};
use nonempty::NonEmpty;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Time-locked capsule storage.
///
/// Owns a dense, append-only table of [`Capsule`]s addressed by sequential
/// [`CapsuleId`], plus an index from each owner to the ids they created.
/// Creation is the only mutation; everything else is a read that never fails.
///
/// The vault does not decrypt anything. It admits ciphertexts through the
/// [`EncryptedValueService`] when a capsule is created, and later decides
/// whether the stored handles may be handed back for decryption.
#[derive(Debug)]
pub struct Vault<
    E: EncryptedValueService,
    L: CapsuleListener = NoListener,
    C: Clock = SystemClock,
> {
    id: VaultId,

    /// Fixed at construction; may request decryption of any admitted capsule.
    decrypt_manager: Identifier,

    config: VaultConfig,

    /// Record `i` has id `i`. The length doubles as the creation counter.
    capsules: Vec<Capsule>,

    /// Owner index, each list in creation order.
    owners: HashMap<Identifier, Vec<CapsuleId>>,

    service: E,

    /// Observer for [`Event`](crate::event::Event)s. Intended for running live updates.
    event_listener: L,

    clock: C,
}

impl<E: EncryptedValueService, L: CapsuleListener, C: Clock> Vault<E, L, C> {
    pub fn new(
        id: VaultId,
        decrypt_manager: Identifier,
        config: VaultConfig,
        service: E,
        event_listener: L,
        clock: C,
    ) -> Self {
        Self {
            id,
            decrypt_manager,
            config,
            capsules: Vec::new(),
            owners: HashMap::new(),
            service,
            event_listener,
            clock,
        }
    }

    /// Create an empty vault with a fresh random [`VaultId`].
    pub fn generate<R: rand::CryptoRng + rand::RngCore>(
        decrypt_manager: Identifier,
        config: VaultConfig,
        service: E,
        event_listener: L,
        clock: C,
        csprng: &mut R,
    ) -> Self {
        Self::new(
            VaultId::generate(csprng),
            decrypt_manager,
            config,
            service,
            event_listener,
            clock,
        )
    }

    pub fn id(&self) -> VaultId {
        self.id
    }

    pub fn decrypt_manager(&self) -> Identifier {
        self.decrypt_manager
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn service(&self) -> &E {
        &self.service
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The current time as the vault sees it.
    pub fn now(&self) -> UnixTimestamp {
        self.clock.now()
    }

    /// Lock `payload` until `unlock_time` on behalf of `caller`.
    ///
    /// Either every input is admitted and the capsule is committed, or nothing
    /// changes: no record, no index entry, no counter increment, no event, and
    /// no access granted by the service.
    /// The unlock time and slot count are checked before anything is sent to the
    /// [`EncryptedValueService`].
    ///
    /// Returns the new capsule's id, which is the number of capsules that
    /// existed immediately before this call.
    #[instrument(
        skip(self, payload),
        fields(vault = %self.id, owner = %caller, slots = payload.len())
    )]
    pub async fn create_capsule(
        &mut self,
        caller: Identifier,
        payload: NonEmpty<CiphertextInput>,
        unlock_time: UnixTimestamp,
    ) -> Result<CapsuleId, CreateCapsuleError> {
        let now = self.clock.now();
        if unlock_time <= now {
            warn!(%unlock_time, %now, "rejecting capsule that would already be unlocked");
            return Err(CreateCapsuleError::InvalidUnlockTime { unlock_time, now });
        }

        let max = self.config.max_payload_slots;
        if payload.len() > max {
            warn!(given = payload.len(), max, "rejecting oversized payload");
            return Err(CreateCapsuleError::TooManySlots {
                given: payload.len(),
                max,
            });
        }

        let context = AdmissionContext {
            vault: self.id,
            submitter: caller,
            decrypt_manager: self.decrypt_manager,
        };

        // Nothing below may touch vault or service state until every input is admitted.
        let mut admissions = NonEmpty::new(self.admit_slot(0, &payload.head, &context).await?);
        for (offset, input) in payload.tail.iter().enumerate() {
            admissions.push(self.admit_slot(offset + 1, input, &context).await?);
        }

        self.service
            .commit(&admissions, &context)
            .await
            .map_err(|source| {
                warn!(%source, "service refused to commit admissions");
                CreateCapsuleError::CommitFailed { source }
            })?;

        let handles = admissions.map(|admission| admission.durable);

        let id = CapsuleId(self.capsules.len() as u64);
        self.capsules.push(Capsule {
            id,
            owner: caller,
            unlock_time,
            payload: handles,
        });
        self.owners.entry(caller).or_default().push(id);

        debug!(%id, %unlock_time, "capsule created");

        self.event_listener
            .on_capsule_created(&CapsuleCreated {
                id,
                owner: caller,
                unlock_time,
            })
            .await;

        Ok(id)
    }

    async fn admit_slot(
        &self,
        slot: usize,
        input: &CiphertextInput,
        context: &AdmissionContext,
    ) -> Result<Admission, CreateCapsuleError> {
        self.service.admit(input, context).await.map_err(|source| {
            warn!(slot, handle = %input.handle, %source, "ciphertext rejected");
            CreateCapsuleError::InvalidCiphertext { slot, source }
        })
    }

    /// Look up a capsule. Ids that were never assigned give [`CapsuleSlot::Vacant`].
    pub fn get_capsule(&self, id: CapsuleId) -> CapsuleSlot<'_> {
        id.as_index()
            .and_then(|index| self.capsules.get(index))
            .into()
    }

    /// Ids created by `owner`, oldest first. Empty if they never created one.
    pub fn get_user_capsules(&self, owner: &Identifier) -> &[CapsuleId] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of capsules ever created.
    pub fn get_total_capsules(&self) -> u64 {
        self.capsules.len() as u64
    }

    /// All capsules, in id order.
    pub fn capsules(&self) -> &[Capsule] {
        &self.capsules
    }

    /// Whether the capsule exists and its unlock time has been reached.
    ///
    /// Unknown ids are simply not unlockable; use [`Vault::get_capsule`] to tell the
    /// two cases apart.
    pub fn can_unlock(&self, id: CapsuleId) -> bool {
        self.get_capsule(id)
            .capsule()
            .is_some_and(|capsule| capsule.is_unlockable_at(self.clock.now()))
    }

    /// How much longer the capsule stays locked; zero once it can be unlocked.
    pub fn time_until_unlock(&self, id: CapsuleId) -> Option<TimeRemaining> {
        self.get_capsule(id)
            .unlock_time()
            .map(|unlock_time| self.clock.now().until(unlock_time).into())
    }

    /// Release a capsule's handles to `requester` for decryption.
    ///
    /// Succeeds only once the capsule is unlockable, and only for its owner or
    /// the decrypt manager. Confidentiality still rests with the
    /// [`EncryptedValueService`], which checks the requester's signature.
    #[instrument(skip(self), fields(vault = %self.id))]
    pub fn handoff(
        &self,
        id: CapsuleId,
        requester: Identifier,
    ) -> Result<DecryptionHandoff, HandoffError> {
        let capsule = self
            .get_capsule(id)
            .capsule()
            .ok_or(HandoffError::NotFound(id))?;

        let now = self.clock.now();
        if !capsule.is_unlockable_at(now) {
            return Err(HandoffError::StillLocked {
                id,
                remaining: now.until(capsule.unlock_time).into(),
            });
        }

        if requester != capsule.owner && requester != self.decrypt_manager {
            warn!(%requester, "handoff refused");
            return Err(HandoffError::Unauthorized { id, requester });
        }

        Ok(DecryptionHandoff {
            capsule_id: id,
            owner: capsule.owner,
            requester,
            handles: capsule.payload.clone(),
        })
    }

    pub fn into_archive(&self) -> VaultArchive {
        VaultArchive {
            id: self.id,
            decrypt_manager: self.decrypt_manager,
            capsules: self.capsules.clone(),
            owners: self.owners.clone(),
        }
    }

    /// Rebuild a vault from an archive, rejecting archives that break the
    /// record/index invariants.
    pub fn try_from_archive(
        archive: VaultArchive,
        config: VaultConfig,
        service: E,
        event_listener: L,
        clock: C,
    ) -> Result<Self, TryFromArchiveError> {
        archive.validate(&config)?;

        Ok(Self {
            id: archive.id,
            decrypt_manager: archive.decrypt_manager,
            config,
            capsules: archive.capsules,
            owners: archive.owners,
            service,
            event_listener,
            clock,
        })
    }
}

#[derive(Debug, Error)]
pub enum CreateCapsuleError {
    #[error("Unlock time {unlock_time} must be after the current time {now}")]
    InvalidUnlockTime {
        unlock_time: UnixTimestamp,
        now: UnixTimestamp,
    },

    #[error("{given} ciphertext inputs exceed the limit of {max}")]
    TooManySlots { given: usize, max: usize },

    #[error("Ciphertext in slot {slot} was rejected: {source}")]
    InvalidCiphertext {
        slot: usize,
        #[source]
        source: AdmissionError,
    },

    #[error("Admitted ciphertexts could not be committed: {source}")]
    CommitFailed {
        #[source]
        source: AdmissionError,
    },
}
