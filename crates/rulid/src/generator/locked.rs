use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    MonotonicEntropy, MonotonicSource, RandSource, Result, U80, Ulid,
    generator::{Mutex, MutexGuard},
};

/// A lock-based monotonic entropy source suitable for multi-threaded
/// environments.
///
/// Wraps one [`MonotonicEntropy`] in an [`Arc<Mutex<_>>`]. Every call holds
/// the lock for its full duration, so all clones share a single, totally
/// ordered stream: within one millisecond, every value handed out is
/// strictly greater than every value handed out before it.
///
/// Contention is the price of that guarantee. When a global order is not
/// needed, [`PooledMonotonic`] scales better.
///
/// ## Features
/// - ✅ Thread-safe (`Clone` shares the same state)
/// - ✅ Globally monotonic per millisecond
/// - ❌ Serializes all callers on one lock
///
/// # Example
///
/// ```
/// use rulid::{LockedMonotonic, ThreadRandom};
///
/// let source = LockedMonotonic::new(ThreadRandom, 0);
/// let ids: Vec<_> = std::thread::scope(|s| {
///     let handles: Vec<_> = (0..4)
///         .map(|_| s.spawn(|| source.next_ulid(42)))
///         .collect();
///     handles.into_iter().map(|h| h.join().unwrap()).collect()
/// });
/// assert!(ids.iter().all(Result::is_ok));
/// ```
///
/// [`PooledMonotonic`]: crate::PooledMonotonic
pub struct LockedMonotonic<R> {
    #[cfg(feature = "cache-padded")]
    pub(crate) state: Arc<crossbeam_utils::CachePadded<Mutex<MonotonicEntropy<R>>>>,
    #[cfg(not(feature = "cache-padded"))]
    pub(crate) state: Arc<Mutex<MonotonicEntropy<R>>>,
}

impl<R: RandSource> LockedMonotonic<R> {
    /// Creates a shared source around a fresh [`MonotonicEntropy`].
    ///
    /// See [`MonotonicEntropy::new`] for the meaning of `inc`.
    pub fn new(rng: R, inc: u64) -> Self {
        Self::from_entropy(MonotonicEntropy::new(rng, inc))
    }

    /// Shares an existing generator, keeping its state.
    pub fn from_entropy(entropy: MonotonicEntropy<R>) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(Mutex::new(entropy))),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(Mutex::new(entropy)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MonotonicEntropy<R>>> {
        #[cfg(feature = "parking-lot")]
        let guard = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let guard = self.state.lock()?;
        Ok(guard)
    }

    /// Fills `dest` with monotonic entropy for `ms` under the lock.
    ///
    /// # Errors
    ///
    /// - [`Error::MonotonicOverflow`] when the shared counter is exhausted
    ///   for `ms`.
    /// - [`Error::LockPoisoned`] if another thread panicked while holding
    ///   the lock (not with `parking-lot`).
    /// - Any error of the underlying source.
    ///
    /// [`Error::MonotonicOverflow`]: crate::Error::MonotonicOverflow
    /// [`Error::LockPoisoned`]: crate::Error
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, dest)))]
    pub fn fill_monotonic(&self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        self.lock()?.fill_monotonic(ms, dest)
    }

    /// Generates a ULID for `ms` from the shared stream.
    ///
    /// # Errors
    ///
    /// See [`Self::fill_monotonic`] and [`Ulid::new`].
    pub fn next_ulid(&self, ms: u64) -> Result<Ulid> {
        let mut src = self;
        Ulid::with_monotonic(ms, &mut src)
    }
}

impl<R> Clone for LockedMonotonic<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> core::fmt::Debug for LockedMonotonic<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockedMonotonic").finish_non_exhaustive()
    }
}

impl<R: RandSource> MonotonicSource for &LockedMonotonic<R> {
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        LockedMonotonic::<R>::fill_monotonic(self, ms, dest)
    }
}

impl<R: RandSource> MonotonicSource for LockedMonotonic<R> {
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        Self::fill_monotonic(self, ms, dest)
    }
}

impl<R: RandSource> RandSource for &LockedMonotonic<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        self.lock()?.fill_bytes(dest)
    }
}
