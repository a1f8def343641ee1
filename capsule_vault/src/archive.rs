//! Archive of a [`Vault`][crate::vault::Vault].
//!
//! The record table, the owner index, and the decrypt manager are the whole durable
//! state of a vault; the counter is the length of the record table.

use crate::{
    capsule::{id::CapsuleId, Capsule},
    config::VaultConfig,
    principal::{identifier::Identifier, vault_id::VaultId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Serialized representation of a [`Vault`][crate::vault::Vault].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultArchive {
    pub(crate) id: VaultId,
    pub(crate) decrypt_manager: Identifier,
    pub(crate) capsules: Vec<Capsule>,
    pub(crate) owners: HashMap<Identifier, Vec<CapsuleId>>,
}

impl VaultArchive {
    /// Getter for the vault that the [`VaultArchive`] is for.
    pub fn id(&self) -> VaultId {
        self.id
    }

    pub fn decrypt_manager(&self) -> Identifier {
        self.decrypt_manager
    }

    pub fn total_capsules(&self) -> u64 {
        self.capsules.len() as u64
    }

    /// Check the invariants a live vault configured with `config` maintains.
    ///
    /// * Record `i` has id `i`.
    /// * No record carries more payload slots than `config` allows.
    /// * Each record appears exactly once in its owner's index, in id order.
    /// * The index mentions no other ids and no empty owners.
    pub fn validate(&self, config: &VaultConfig) -> Result<(), TryFromArchiveError> {
        let mut expected: HashMap<Identifier, Vec<CapsuleId>> = HashMap::new();
        for (position, capsule) in self.capsules.iter().enumerate() {
            let position = CapsuleId(position as u64);
            if capsule.id != position {
                return Err(TryFromArchiveError::IdOutOfPlace {
                    position,
                    found: capsule.id,
                });
            }

            if capsule.payload.len() > config.max_payload_slots {
                return Err(TryFromArchiveError::TooManySlots {
                    id: capsule.id,
                    given: capsule.payload.len(),
                    max: config.max_payload_slots,
                });
            }

            expected.entry(capsule.owner).or_default().push(capsule.id);
        }

        for (owner, ids) in self.owners.iter() {
            if expected.get(owner) != Some(ids) {
                return Err(TryFromArchiveError::OwnerIndexMismatch(*owner));
            }
        }

        if let Some(owner) = expected.keys().find(|owner| !self.owners.contains_key(*owner)) {
            return Err(TryFromArchiveError::OwnerIndexMismatch(*owner));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TryFromArchiveError {
    #[error("Record at position {position} has id {found}")]
    IdOutOfPlace { position: CapsuleId, found: CapsuleId },

    #[error("Capsule {id} has {given} payload slots but the limit is {max}")]
    TooManySlots {
        id: CapsuleId,
        given: usize,
        max: usize,
    },

    #[error("Owner index for {0} does not match the records it owns")]
    OwnerIndexMismatch(Identifier),
}
