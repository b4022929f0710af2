use crate::id::SnowflakeId;

/// Represents the result of a non-blocking generation attempt.
///
/// This type models the outcome of [`Generator::poll`]:
///
/// - [`IdGenStatus::Ready`] indicates a new ID was generated.
/// - [`IdGenStatus::Pending`] means all 4096 sequence values of the current
///   millisecond are spent and no ID can be produced until the clock reaches
///   `yield_until`.
///
/// This allows non-blocking generation loops and clean backoff strategies.
///
/// # Example
///
/// ```
/// use flakeid::{Generator, IdGenStatus};
///
/// let generator = Generator::new(1, 1).unwrap();
/// let id = loop {
///     match generator.poll() {
///         Ok(IdGenStatus::Ready { id }) => break id,
///         Ok(IdGenStatus::Pending { .. }) => std::thread::yield_now(),
///         Err(e) => panic!("generator error: {e}"),
///     }
/// };
/// assert_eq!(id.node_id(), 1);
/// ```
///
/// [`Generator::poll`]: crate::Generator::poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: SnowflakeId,
    },
    /// The sequence is exhausted for the current millisecond.
    ///
    /// Wait until the clock reaches or exceeds `yield_until` before trying
    /// again.
    Pending {
        /// The first timestamp (inclusive, ms since epoch) at which generation
        /// can resume.
        yield_until: u64,
    },
}

impl IdGenStatus {
    /// Returns the ID if one was produced.
    pub const fn ready(self) -> Option<SnowflakeId> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }
}
