//! Cryptographic primitives, wrappers, and utilities.

pub mod digest;
pub mod domain_separator;
pub mod handle;
pub mod signed;
pub mod signer;
pub mod siv;
pub mod symmetric_key;
pub mod verifiable;
