//! Sources of "now" for time-lock checks.

use super::UnixTimestamp;
use dupe::Dupe;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

/// Something the vault can ask for the current time.
///
/// Every time-dependent check reads the clock afresh; nothing is cached.
pub trait Clock {
    fn now(&self) -> UnixTimestamp;
}

/// The operating system's wall clock.
#[derive(Debug, Default, Clone, Copy, Dupe, PartialEq, Eq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle and
/// advance the clock a [`Vault`](crate::vault::Vault) is reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    pub fn new(start: UnixTimestamp) -> Self {
        Self(Arc::new(AtomicU64::new(start.0)))
    }

    pub fn set(&self, to: UnixTimestamp) {
        self.0.store(to.0, Ordering::SeqCst)
    }

    /// Move forward by `by`, stopping at the largest representable time.
    pub fn advance(&self, by: Duration) {
        let secs = by.as_secs();
        let _ = self
            .0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(secs))
            });
    }
}

impl Dupe for ManualClock {
    fn dupe(&self) -> Self {
        Self(self.0.dupe())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> UnixTimestamp {
        UnixTimestamp(self.0.load(Ordering::SeqCst))
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> UnixTimestamp {
        (*self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new(UnixTimestamp(100));
        let handle = clock.dupe();
        handle.advance(Duration::from_secs(50));
        assert_eq!(clock.now(), UnixTimestamp(150));

        clock.set(UnixTimestamp(10));
        assert_eq!(handle.now(), UnixTimestamp(10));
    }

    #[test]
    fn test_advance_saturates_like_timestamp_addition() {
        let start = UnixTimestamp(u64::MAX - 10);
        let clock = ManualClock::new(start);
        clock.advance(Duration::from_secs(60));
        assert_eq!(clock.now(), UnixTimestamp(u64::MAX));
        assert_eq!(clock.now(), start + Duration::from_secs(60));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > UnixTimestamp(1_577_836_800));
    }
}
