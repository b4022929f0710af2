use core::{future::Future, time::Duration};

/// A trait that abstracts over how to sleep for a given [`Duration`] in async
/// contexts.
///
/// [`Generator::generate_async`] awaits the provider whenever the current
/// millisecond's sequence is exhausted.
///
/// [`Generator::generate_async`]: crate::Generator::generate_async
pub trait SleepProvider {
    /// Returns a future that completes after roughly `dur`. The future must be
    /// `Send` so generation can move across worker threads.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
