//! Sign payloads.

pub mod memory;
pub mod sync_signer;
