//! Trait for listening to capsule lifecycle events.

use crate::event::CapsuleCreated;

/// Trait for listening to [`Vault`](crate::vault::Vault) events.
///
/// Callbacks run after the change has been committed, in commit order, and
/// never for a rejected operation.
///
/// <div class="warning">
///
/// Note that we assume single-threaded async.
///
/// </div>
#[allow(async_fn_in_trait)]
pub trait CapsuleListener: Sized + Clone {
    /// React to a newly created capsule.
    async fn on_capsule_created(&self, event: &CapsuleCreated);
}
