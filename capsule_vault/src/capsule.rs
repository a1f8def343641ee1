//! The capsule record and the slot it lives in.

pub mod id;

use self::id::CapsuleId;
use crate::{
    crypto::handle::CiphertextHandle, principal::identifier::Identifier, time::UnixTimestamp,
};
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

/// A locked payload: encrypted handles that may be decrypted once `unlock_time` has passed.
///
/// Every field is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capsule {
    pub(crate) id: CapsuleId,
    pub(crate) owner: Identifier,
    pub(crate) unlock_time: UnixTimestamp,
    pub(crate) payload: NonEmpty<CiphertextHandle>,
}

impl Capsule {
    pub fn id(&self) -> CapsuleId {
        self.id
    }

    /// The identity that created this capsule.
    pub fn owner(&self) -> Identifier {
        self.owner
    }

    pub fn unlock_time(&self) -> UnixTimestamp {
        self.unlock_time
    }

    /// The durable handles returned by the
    /// [`EncryptedValueService`](crate::service::EncryptedValueService) at admission,
    /// one per payload slot, in submission order.
    pub fn payload(&self) -> &NonEmpty<CiphertextHandle> {
        &self.payload
    }

    /// Whether the lock has expired at `now`.
    pub fn is_unlockable_at(&self, now: UnixTimestamp) -> bool {
        now >= self.unlock_time
    }
}

/// The result of looking up a capsule by id.
///
/// Lookups never fail. An id that was never assigned yields [`CapsuleSlot::Vacant`],
/// which carries no fields that could be mistaken for real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsuleSlot<'a> {
    Vacant,
    Occupied(&'a Capsule),
}

impl<'a> CapsuleSlot<'a> {
    pub fn exists(&self) -> bool {
        matches!(self, CapsuleSlot::Occupied(_))
    }

    pub fn capsule(&self) -> Option<&'a Capsule> {
        match self {
            CapsuleSlot::Vacant => None,
            CapsuleSlot::Occupied(capsule) => Some(capsule),
        }
    }

    pub fn owner(&self) -> Option<Identifier> {
        self.capsule().map(Capsule::owner)
    }

    pub fn unlock_time(&self) -> Option<UnixTimestamp> {
        self.capsule().map(Capsule::unlock_time)
    }

    pub fn payload(&self) -> Option<&'a NonEmpty<CiphertextHandle>> {
        self.capsule().map(Capsule::payload)
    }
}

impl<'a> From<Option<&'a Capsule>> for CapsuleSlot<'a> {
    fn from(capsule: Option<&'a Capsule>) -> Self {
        capsule.map_or(CapsuleSlot::Vacant, CapsuleSlot::Occupied)
    }
}

impl<'a> From<CapsuleSlot<'a>> for Option<&'a Capsule> {
    fn from(slot: CapsuleSlot<'a>) -> Self {
        slot.capsule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nonempty::nonempty;

    fn capsule(unlock_time: u64) -> Capsule {
        Capsule {
            id: CapsuleId(0),
            owner: Identifier::generate(&mut rand::thread_rng()),
            unlock_time: UnixTimestamp(unlock_time),
            payload: nonempty![CiphertextHandle([7; 32])],
        }
    }

    #[test]
    fn test_unlockable_boundary_is_inclusive() {
        let c = capsule(500);
        assert!(!c.is_unlockable_at(UnixTimestamp(499)));
        assert!(c.is_unlockable_at(UnixTimestamp(500)));
        assert!(c.is_unlockable_at(UnixTimestamp(501)));
    }

    #[test]
    fn test_vacant_slot_has_no_fields() {
        let slot = CapsuleSlot::from(None::<&Capsule>);
        assert!(!slot.exists());
        assert_eq!(slot.owner(), None);
        assert_eq!(slot.unlock_time(), None);
        assert!(slot.payload().is_none());
    }

    #[test]
    fn test_occupied_slot_exposes_record() {
        let c = capsule(42);
        let slot = CapsuleSlot::from(Some(&c));
        assert!(slot.exists());
        assert_eq!(slot.owner(), Some(c.owner()));
        assert_eq!(slot.unlock_time(), Some(UnixTimestamp(42)));
        assert_eq!(slot.payload(), Some(&c.payload));
    }
}
