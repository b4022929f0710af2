use core::cmp::Ordering;

use parking_lot::Mutex;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    error::{Error, Field, Result},
    generator::IdGenStatus,
    id::SnowflakeId,
    time::{SystemClock, TimeSource},
};

/// Mutable generator state. Only ever touched with the lock held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct State {
    pub(crate) last_timestamp: u64,
    pub(crate) sequence: u64,
}

impl State {
    fn rollover_to_timestamp(&mut self, now: u64) {
        self.last_timestamp = now;
        self.sequence = 0;
    }
}

/// A lock-based Snowflake ID generator for one node.
///
/// The generator stores its node and partition identifiers and guards the
/// last-issued timestamp and sequence with a single [`parking_lot::Mutex`].
/// Every call to [`Generator::generate`] holds that lock from the clock read
/// to the packed result, so concurrent callers serialize completely and no two
/// calls on one generator can ever produce the same ID.
///
/// Uniqueness across generators relies on every generator in a deployment
/// having a distinct `(node_id, partition_id)` pair. The generator does not
/// check this.
///
/// Share one instance between threads with [`std::sync::Arc`].
///
/// ## See Also
/// - [`Generator::poll`] for a non-blocking variant
/// - [`decompose`] to split an ID back into its fields
///
/// [`decompose`]: crate::decompose
#[derive(Debug)]
pub struct Generator<T = SystemClock> {
    node_id: u64,
    partition_id: u64,
    #[cfg(feature = "cache-padded")]
    pub(crate) state: crossbeam_utils::CachePadded<Mutex<State>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Mutex<State>,
    clock: T,
}

impl Generator<SystemClock> {
    /// Creates a generator reading the system wall clock against
    /// [`DEFAULT_EPOCH`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `node_id` or `partition_id`
    /// is outside `0..=31`. The node ID is checked first.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{Error, Field, Generator};
    ///
    /// let generator = Generator::new(30, 3).unwrap();
    /// let id = generator.generate().unwrap();
    /// assert_eq!(id.node_id(), 30);
    /// assert_eq!(id.partition_id(), 3);
    ///
    /// let err = Generator::new(32, 0).unwrap_err();
    /// assert_eq!(err, Error::InvalidConfiguration { field: Field::Node, value: 32, max: 31 });
    /// ```
    ///
    /// [`DEFAULT_EPOCH`]: crate::DEFAULT_EPOCH
    pub fn new(node_id: i64, partition_id: i64) -> Result<Self> {
        Self::with_clock(node_id, partition_id, SystemClock::default())
    }
}

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Creates a generator that reads time from `clock`.
    ///
    /// The initial state has a last timestamp and sequence of zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `node_id` or `partition_id`
    /// is outside `0..=31`.
    pub fn with_clock(node_id: i64, partition_id: i64, clock: T) -> Result<Self> {
        let node_id = validate(Field::Node, node_id, SnowflakeId::max_node_id())?;
        let partition_id = validate(
            Field::Partition,
            partition_id,
            SnowflakeId::max_partition_id(),
        )?;

        Ok(Self {
            node_id,
            partition_id,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(State::default())),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(State::default()),
            clock,
        })
    }

    /// Returns the node ID embedded in every generated ID.
    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Returns the partition ID embedded in every generated ID.
    pub const fn partition_id(&self) -> u64 {
        self.partition_id
    }

    /// Returns the time source.
    pub const fn clock(&self) -> &T {
        &self.clock
    }

    /// Generates the next ID, blocking while the current millisecond's
    /// sequence is exhausted.
    ///
    /// When 4096 IDs have already been issued in the current millisecond, the
    /// call spins on the clock until it advances and then issues sequence `0`
    /// of the new millisecond. The lock stays held during that wait, so other
    /// callers queue behind it. The wait cannot be cancelled; use
    /// [`Generator::poll`] to build a cancellable loop.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] if the clock reads earlier than
    /// the last issued timestamp. State is left untouched, so retrying once
    /// the clock catches up is safe.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<SnowflakeId> {
        let mut state = self.state.lock();

        match self.poll_locked(&mut state, self.clock.current_millis())? {
            IdGenStatus::Ready { id } => Ok(id),
            IdGenStatus::Pending { yield_until } => {
                let now = self.wait_until(yield_until);
                state.rollover_to_timestamp(now);
                Ok(self.pack(&state))
            }
        }
    }

    /// Attempts to generate the next ID without waiting.
    ///
    /// Returns [`IdGenStatus::Pending`] instead of blocking when the current
    /// millisecond's sequence is exhausted. A pending result leaves state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockMovedBackward`] under the same conditions as
    /// [`Generator::generate`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll(&self) -> Result<IdGenStatus> {
        let mut state = self.state.lock();
        self.poll_locked(&mut state, self.clock.current_millis())
    }

    fn poll_locked(&self, state: &mut State, now: u64) -> Result<IdGenStatus> {
        match now.cmp(&state.last_timestamp) {
            Ordering::Equal => {
                if state.sequence < SnowflakeId::max_sequence() {
                    state.sequence += 1;
                    Ok(IdGenStatus::Ready {
                        id: self.pack(state),
                    })
                } else {
                    Ok(IdGenStatus::Pending {
                        yield_until: state.last_timestamp + 1,
                    })
                }
            }
            Ordering::Greater => {
                state.rollover_to_timestamp(now);
                Ok(IdGenStatus::Ready {
                    id: self.pack(state),
                })
            }
            Ordering::Less => Err(Self::cold_clock_behind(state.last_timestamp, now)),
        }
    }

    /// Spins until the clock reads at least `yield_until` and returns that
    /// reading. Readings that are still behind are ignored.
    fn wait_until(&self, yield_until: u64) -> u64 {
        loop {
            let now = self.clock.current_millis();
            if now >= yield_until {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    fn pack(&self, state: &State) -> SnowflakeId {
        SnowflakeId::from_components(
            state.last_timestamp,
            self.partition_id,
            self.node_id,
            state.sequence,
        )
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::warn!(last, now, behind_by = last - now, "clock moved backward");
        Error::ClockMovedBackward { last, now }
    }
}

fn validate(field: Field, value: i64, max: u64) -> Result<u64> {
    u64::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or(Error::InvalidConfiguration { field, value, max })
}
