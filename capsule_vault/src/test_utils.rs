use crate::{
    config::VaultConfig,
    crypto::{
        signed::SigningError,
        signer::{memory::MemorySigner, sync_signer::SyncSigner},
    },
    handoff::DecryptionHandoff,
    listener::log::Log,
    message::{decode_message, encode_message, MessageError},
    service::{
        memory::{EncryptError, MemoryEncryptedValueService},
        CiphertextInput, DecryptError, EncryptedValueService,
    },
    time::{clock::ManualClock, UnixTimestamp},
    vault::Vault,
};
use dupe::Dupe;
use nonempty::NonEmpty;
use thiserror::Error;

/// Where [`make_simple_vault`] starts its clock.
pub const GENESIS: UnixTimestamp = UnixTimestamp(1_700_000_000);

pub type SimpleVault = Vault<MemoryEncryptedValueService, Log, ManualClock>;

/// A vault wired to an in-memory service, an event log, and a manual clock,
/// with handles kept on each so tests can drive and observe it.
#[derive(Debug)]
pub struct Harness {
    pub vault: SimpleVault,
    pub service: MemoryEncryptedValueService,
    pub clock: ManualClock,
    pub log: Log,
    pub manager: MemorySigner,
}

pub fn make_simple_vault() -> Harness {
    make_vault_with_config(VaultConfig::default())
}

pub fn make_vault_with_config(config: VaultConfig) -> Harness {
    let mut csprng = rand::thread_rng();
    let service = MemoryEncryptedValueService::generate(&mut csprng);
    let clock = ManualClock::new(GENESIS);
    let log = Log::new();
    let manager = MemorySigner::generate(&mut csprng);

    let vault = Vault::generate(
        manager.id(),
        config,
        service.dupe(),
        log.dupe(),
        clock.dupe(),
        &mut csprng,
    );

    Harness {
        vault,
        service,
        clock,
        log,
        manager,
    }
}

impl Harness {
    /// Encode `message` into the vault's slots and encrypt each slot for `owner`.
    pub async fn seal_message(
        &self,
        owner: &MemorySigner,
        message: &str,
    ) -> Result<NonEmpty<CiphertextInput>, HarnessError> {
        let words = encode_message(message, self.vault.config().max_payload_slots)?;

        let mut inputs = Vec::with_capacity(words.len());
        for word in words {
            inputs.push(
                self.service
                    .encrypt(self.vault.id(), owner.id(), &word.to_be_bytes())
                    .await?,
            );
        }

        NonEmpty::from_vec(inputs).ok_or(HarnessError::NoSlots)
    }

    /// Decrypt every handle in `handoff` as `requester` and decode the message.
    pub async fn open_message(
        &self,
        handoff: &DecryptionHandoff,
        requester: &MemorySigner,
    ) -> Result<String, HarnessError> {
        let mut words = Vec::with_capacity(handoff.handles.len());
        for (handle, request) in handoff.sign_requests(requester)? {
            let bytes = self.service.decrypt(&handle, &request).await?;
            let word: [u8; 4] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| HarnessError::BadSlotWidth(bytes.len()))?;
            words.push(u32::from_be_bytes(word));
        }

        Ok(decode_message(&words))
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Encrypt(#[from] EncryptError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error("Vault is configured with zero payload slots")]
    NoSlots,

    #[error("Decrypted slot is {0} bytes wide")]
    BadSlotWidth(usize),
}
