#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_debug_implementations,
    future_incompatible,
    let_underscore,
//     missing_docs,
    rust_2021_compatibility,
    nonstandard_style
)]
#![deny(unreachable_pub)]

pub mod archive;
pub mod capsule;
pub mod config;
pub mod crypto;
pub mod event;
pub mod handoff;
pub mod listener;
pub mod message;
pub mod principal;
pub mod service;
pub mod time;
pub mod vault;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
