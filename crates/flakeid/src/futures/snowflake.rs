use core::time::Duration;

use crate::{
    error::Result,
    futures::SleepProvider,
    generator::{Generator, IdGenStatus},
    id::SnowflakeId,
    time::TimeSource,
};

impl<T> Generator<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID.
    ///
    /// Unlike [`Generator::generate`], the lock is released while waiting for
    /// the clock: if the current millisecond's sequence is exhausted the
    /// future sleeps through `S` and polls again. State only changes when an
    /// ID is issued, so dropping the future (e.g. from `tokio::time::timeout`)
    /// at any await point is safe.
    ///
    /// # Errors
    ///
    /// Resolves to [`Error::ClockMovedBackward`] if the clock reads earlier
    /// than the last issued timestamp. The future does not retry that case.
    ///
    /// # Example
    ///
    /// ```
    /// use flakeid::{Generator, TokioSleep};
    ///
    /// # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
    /// let generator = Generator::new(1, 1).unwrap();
    /// let id = generator.generate_async::<TokioSleep>().await.unwrap();
    /// assert_eq!(id.node_id(), 1);
    /// # });
    /// ```
    ///
    /// [`Error::ClockMovedBackward`]: crate::Error::ClockMovedBackward
    pub async fn generate_async<S>(&self) -> Result<SnowflakeId>
    where
        S: SleepProvider,
    {
        loop {
            let dur = match self.poll()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_until } => {
                    let now = self.clock().current_millis();
                    Duration::from_millis(yield_until.saturating_sub(now))
                }
            };
            S::sleep_for(dur).await;
        }
    }
}
