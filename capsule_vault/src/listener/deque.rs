use super::capsule::CapsuleListener;
use crate::event::{CapsuleCreated, Event};
use derive_more::{From, Into};
use dupe::Dupe;
use futures::lock::Mutex;
use std::{collections::VecDeque, sync::Arc};
use tracing::instrument;

/// A queue of [`Event`]s for consumers that drain as they go.
#[derive(Debug, Default, From, Into)]
pub struct Deque(pub Arc<Mutex<VecDeque<Event>>>);

impl Deque {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(VecDeque::new())))
    }

    pub async fn push(&self, event: Event) {
        let mut locked = self.0.lock().await;
        locked.push_back(event)
    }

    pub async fn pop_latest(&self) -> Option<Event> {
        let mut locked = self.0.lock().await;
        locked.pop_back()
    }

    pub async fn pop_earliest(&self) -> Option<Event> {
        let mut locked = self.0.lock().await;
        locked.pop_front()
    }

    pub async fn is_empty(&self) -> bool {
        let locked = self.0.lock().await;
        locked.is_empty()
    }

    pub async fn clear(&self) {
        let mut locked = self.0.lock().await;
        locked.clear()
    }
}

impl Clone for Deque {
    fn clone(&self) -> Self {
        Self(self.0.dupe())
    }
}

impl Dupe for Deque {
    fn dupe(&self) -> Self {
        self.clone()
    }
}

impl CapsuleListener for Deque {
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
    async fn test_earliest_and_latest() {
        let deque = Deque::new();
        let owner = Identifier::generate(&mut rand::thread_rng());
        for i in 0..3 {
            deque
                .on_capsule_created(&CapsuleCreated {
                    id: CapsuleId(i),
                    owner,
                    unlock_time: UnixTimestamp(i),
                })
                .await;
        }

        let Some(Event::CapsuleCreated(first)) = deque.pop_earliest().await else {
            panic!("expected an event");
        };
        let Some(Event::CapsuleCreated(last)) = deque.pop_latest().await else {
            panic!("expected an event");
        };
        assert_eq!(first.id, CapsuleId(0));
        assert_eq!(last.id, CapsuleId(2));
        assert!(!deque.is_empty().await);
    }
}
