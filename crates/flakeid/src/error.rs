use core::fmt;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The constructor argument rejected by [`Error::InvalidConfiguration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The node identifier (bits 12..=16 of an ID).
    Node,
    /// The partition identifier (bits 17..=21 of an ID).
    Partition,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node => f.write_str("node id"),
            Self::Partition => f.write_str("partition id"),
        }
    }
}

/// All error variants that `flakeid` can emit.
///
/// The set is closed: construction can only fail with
/// [`Error::InvalidConfiguration`] and generation can only fail with
/// [`Error::ClockMovedBackward`]. Lock acquisition never fails because the
/// generator uses a non-poisoning mutex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// A node or partition identifier was outside `0..=max`.
    ///
    /// Retrying with the same input always fails.
    #[error("{field} must be between 0 and {max}, got {value}")]
    InvalidConfiguration {
        /// Which constructor argument was rejected.
        field: Field,
        /// The rejected value, as supplied by the caller.
        value: i64,
        /// The largest accepted value (inclusive).
        max: u64,
    },

    /// The clock reported a time earlier than the last issued timestamp.
    ///
    /// No generator state was changed. Waiting [`Error::behind_by`]
    /// milliseconds and retrying is the expected recovery; the generator never
    /// retries this on its own.
    #[error("clock moved backward by {}ms (last: {last}, now: {now})", skew(.last, .now))]
    ClockMovedBackward {
        /// The last timestamp recorded by the generator.
        last: u64,
        /// The timestamp the clock reported on this call.
        now: u64,
    },
}

const fn skew(last: &u64, now: &u64) -> u64 {
    last.saturating_sub(*now)
}

impl Error {
    /// Returns the clock skew in milliseconds for
    /// [`Error::ClockMovedBackward`], and `None` for any other variant.
    pub const fn behind_by(&self) -> Option<u64> {
        match self {
            Self::ClockMovedBackward { last, now } => Some(skew(last, now)),
            Self::InvalidConfiguration { .. } => None,
        }
    }

    /// Returns `true` if retrying the failed call later may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ClockMovedBackward { .. })
    }
}
