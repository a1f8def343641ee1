use super::capsule::CapsuleListener;
use crate::event::{CapsuleCreated, Event};
use derive_more::{From, Into};
use dupe::Dupe;
use futures::lock::Mutex;
use std::sync::Arc;
use tracing::instrument;

/// Append-only, ordered record of every [`Event`].
#[derive(Debug, From, Into)]
pub struct Log(pub Arc<Mutex<Vec<Event>>>);

impl Log {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    pub async fn push(&self, event: Event) {
        let mut locked = self.0.lock().await;
        locked.push(event)
    }

    pub async fn pop(&self) -> Option<Event> {
        let mut locked = self.0.lock().await;
        locked.pop()
    }

    /// Copy out every event seen so far, oldest first.
    pub async fn events(&self) -> Vec<Event> {
        let locked = self.0.lock().await;
        locked.clone()
    }

    pub async fn is_empty(&self) -> bool {
        let locked = self.0.lock().await;
        locked.is_empty()
    }

    pub async fn clear(&self) {
        let mut locked = self.0.lock().await;
        locked.clear()
    }

    pub async fn len(&self) -> usize {
        let locked = self.0.lock().await;
        locked.len()
    }
}

impl Clone for Log {
    fn clone(&self) -> Self {
        Self(self.0.dupe())
    }
}

impl Dupe for Log {
    fn dupe(&self) -> Self {
        self.clone()
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::new()
    }
}

impl CapsuleListener for Log {
    #[instrument(skip(self))]
    async fn on_capsule_created(&self, event: &CapsuleCreated) {
        self.push((*event).into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capsule::id::CapsuleId, principal::identifier::Identifier, time::UnixTimestamp};

    #[tokio::test]
    async fn test_clones_share_history() {
        let log = Log::new();
        let other = log.dupe();
        let owner = Identifier::generate(&mut rand::thread_rng());

        for i in 0..3 {
            log.on_capsule_created(&CapsuleCreated {
                id: CapsuleId(i),
                owner,
                unlock_time: UnixTimestamp(100 + i),
            })
            .await;
        }

        assert_eq!(other.len().await, 3);
        let ids: Vec<_> = other
            .events()
            .await
            .into_iter()
            .map(|Event::CapsuleCreated(e)| e.id)
            .collect();
        assert_eq!(ids, vec![CapsuleId(0), CapsuleId(1), CapsuleId(2)]);

        other.clear().await;
        assert!(log.is_empty().await);
    }
}
