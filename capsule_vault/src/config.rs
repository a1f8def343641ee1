//! Vault configuration.

use serde::{Deserialize, Serialize};

/// Default number of ciphertext slots per capsule.
///
/// Two 32-bit slots hold an eight byte message.
pub const DEFAULT_MAX_PAYLOAD_SLOTS: usize = 2;

/// Tunables for a [`Vault`](crate::vault::Vault).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Upper bound on the number of ciphertext inputs a single capsule may carry.
    pub max_payload_slots: usize,
}

impl VaultConfig {
    pub fn new(max_payload_slots: usize) -> Self {
        VaultConfig { max_payload_slots }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYLOAD_SLOTS)
    }
}
