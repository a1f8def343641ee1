use derive_more::{Display, From, Into};
use dupe::Dupe;
use serde::{Deserialize, Serialize};

/// Sequential identifier of a [`Capsule`](super::Capsule).
///
/// Assigned by the vault at creation, starting from zero, with no gaps and no reuse.
#[derive(
    Debug,
    Display,
    Copy,
    Dupe,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct CapsuleId(pub u64);

impl CapsuleId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Position in the vault's dense record table.
    ///
    /// Returns `None` on targets where the id does not fit in `usize`.
    pub(crate) fn as_index(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}
