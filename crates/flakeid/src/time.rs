use core::time::Duration;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Default epoch: Tuesday, May 19, 2020 21:20:00 UTC
///
/// IDs produced against this epoch stay within the 41-bit timestamp field
/// until 2090.
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_589_923_200_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Discord epoch: Thursday, January 1, 2015 00:00:00 UTC
pub const DISCORD_EPOCH: Duration = Duration::from_millis(1_420_070_400_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
pub const UNIX_EPOCH_MILLIS: Duration = Duration::from_millis(0);

/// A source of "now", in whole milliseconds since a configured epoch.
///
/// This abstraction allows you to plug in the system wall clock or a scripted
/// clock in tests.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

/// Wall-clock time source, offset from a fixed epoch.
///
/// Every call reads `SystemTime::now()`, so NTP corrections and manual clock
/// changes are visible to the generator. That is what lets the generator
/// detect a clock that moved backward instead of silently issuing IDs from
/// the past.
///
/// A wall clock that reads earlier than the epoch reports `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to [`DEFAULT_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(DEFAULT_EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock whose zero point is `epoch`, given as a [`Duration`]
    /// since 1970-01-01 UTC.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{SystemClock, TimeSource, TWITTER_EPOCH};
    ///
    /// let twitter = SystemClock::with_epoch(TWITTER_EPOCH);
    /// let unix = SystemClock::with_epoch(std::time::Duration::ZERO);
    /// assert!(unix.current_millis() > twitter.current_millis());
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }

    /// Returns the configured epoch.
    pub const fn epoch(&self) -> Duration {
        Duration::from_millis(self.epoch_millis)
    }
}

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        let unix_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
