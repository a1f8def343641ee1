//! Events that are emitted during operation of the [`Vault`](crate::vault::Vault).

use crate::{capsule::id::CapsuleId, principal::identifier::Identifier, time::UnixTimestamp};
use derive_more::From;
use serde::{Deserialize, Serialize};

/// Top-level event variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
pub enum Event {
    /// A capsule was created.
    CapsuleCreated(CapsuleCreated),
}

/// Emitted exactly once per successful [`create_capsule`](crate::vault::Vault::create_capsule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapsuleCreated {
    pub id: CapsuleId,
    pub owner: Identifier,
    pub unlock_time: UnixTimestamp,
}
