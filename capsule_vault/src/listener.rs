//! Event listeners.
//!
//! Listeners are hooks for reacting to when capsules are created.
//! This can be helpful for logging, refreshing a UI, gossip, and so on.
//!
//! If you don't want this feature, use the default listener: [`NoListener`].
//! [`NoListener`] is set as the default listener, so in most common cases manually
//! setting [`NoListener`] is not necessary.
//!
//! [`NoListener`]: self::no_listener::NoListener

pub mod capsule;
pub mod deque;
pub mod log;
pub mod no_listener;
