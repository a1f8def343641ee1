use super::capsule::CapsuleListener;
use crate::event::CapsuleCreated;
use dupe::Dupe;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Dupe, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoListener;

impl CapsuleListener for NoListener {
    async fn on_capsule_created(&self, _event: &CapsuleCreated) {}
}
