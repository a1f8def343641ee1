//! Identities that own capsules or hold decryption authority.

pub mod identifier;
pub mod vault_id;
