//! Timestamps and the clock the vault reads them from.

pub mod clock;

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    ops::Add,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

/// Seconds since the Unix epoch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[cfg_attr(any(test, feature = "arbitrary"), derive(arbitrary::Arbitrary))]
pub struct UnixTimestamp(pub u64);

impl UnixTimestamp {
    /// Read the wall clock.
    ///
    /// A system clock set before 1970 reads as the epoch.
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        )
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Time left until `later`, or zero if `later` is not after `self`.
    pub fn until(&self, later: UnixTimestamp) -> Duration {
        Duration::from_secs(later.0.saturating_sub(self.0))
    }
}

impl From<u64> for UnixTimestamp {
    fn from(seconds: u64) -> Self {
        Self(seconds)
    }
}

impl From<UnixTimestamp> for u64 {
    fn from(ts: UnixTimestamp) -> Self {
        ts.0
    }
}

impl Add<Duration> for UnixTimestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0.saturating_add(rhs.as_secs()))
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How long a capsule stays locked, broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeRemaining {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeRemaining {
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(
            self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds,
        )
    }
}

impl From<Duration> for TimeRemaining {
    fn from(duration: Duration) -> Self {
        let total = duration.as_secs();
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} days, {} hours", self.days, self.hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_saturates() {
        let now = UnixTimestamp(1_000);
        assert_eq!(now.until(UnixTimestamp(400)), Duration::ZERO);
        assert_eq!(now.until(UnixTimestamp(1_060)), Duration::from_secs(60));
    }

    #[test]
    fn test_time_remaining_breakdown() {
        let remaining = TimeRemaining::from(Duration::from_secs(2 * 86_400 + 5 * 3_600 + 7 * 60 + 9));
        assert_eq!(
            remaining,
            TimeRemaining {
                days: 2,
                hours: 5,
                minutes: 7,
                seconds: 9
            }
        );
        assert_eq!(remaining.to_string(), "2 days, 5 hours");
        assert_eq!(remaining.as_duration().as_secs(), 2 * 86_400 + 5 * 3_600 + 7 * 60 + 9);
    }

    #[test]
    fn test_zero_remaining() {
        assert!(TimeRemaining::from(Duration::ZERO).is_zero());
    }
}
