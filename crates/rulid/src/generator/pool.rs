#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    MonotonicEntropy, MonotonicSource, RandSource, Result, U80, Ulid,
    generator::{Mutex, MutexGuard},
};

/// A pool of independent [`MonotonicEntropy`] generators for
/// multi-threaded use.
///
/// Each call checks an idle generator out of a mutex-guarded free list (or
/// builds a new one from the factory), uses it exclusively outside the lock
/// and checks it back in afterwards, also when the call failed. The lock
/// only guards the free list, so callers do not serialize on entropy
/// generation.
///
/// ## Ordering
///
/// Monotonicity holds only among calls that happen to reuse the same
/// generator. Two threads generating within the same millisecond may get
/// values in either order, because they draw from different generators.
/// Use [`LockedMonotonic`] when a single global order is required.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Low contention
/// - ❌ No global order within a millisecond
///
/// # Example
///
/// ```
/// use rulid::{PooledMonotonic, ThreadRandom};
///
/// let pool = PooledMonotonic::new(|| ThreadRandom, 0);
/// let a = pool.next_ulid(7)?;
/// let b = pool.next_ulid(7)?;
/// // Sequential calls reuse the same idle generator.
/// assert!(a < b);
/// # Ok::<(), rulid::Error>(())
/// ```
///
/// [`LockedMonotonic`]: crate::LockedMonotonic
pub struct PooledMonotonic<R, F> {
    pub(crate) free: Mutex<Vec<MonotonicEntropy<R>>>,
    factory: F,
    inc: u64,
    max_idle: Option<usize>,
}

impl<R, F> PooledMonotonic<R, F>
where
    R: RandSource,
    F: Fn() -> R,
{
    /// Creates an empty pool.
    ///
    /// # Parameters
    /// - `factory`: builds the random source of each new generator
    /// - `inc`: increment bound for every generator, see
    ///   [`MonotonicEntropy::new`]
    pub fn new(factory: F, inc: u64) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            factory,
            inc,
            max_idle: None,
        }
    }

    /// Bounds the number of idle generators kept between calls. Surplus
    /// generators are dropped on check-in.
    #[must_use]
    pub fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = Some(max_idle);
        self
    }

    fn idle(&self) -> Result<MutexGuard<'_, Vec<MonotonicEntropy<R>>>> {
        #[cfg(feature = "parking-lot")]
        let guard = self.free.lock();
        #[cfg(not(feature = "parking-lot"))]
        let guard = self.free.lock()?;
        Ok(guard)
    }

    /// Returns the number of generators currently checked in.
    ///
    /// # Errors
    ///
    /// Fails only if the free-list lock is poisoned.
    pub fn idle_len(&self) -> Result<usize> {
        Ok(self.idle()?.len())
    }

    fn check_out(&self) -> Result<MonotonicEntropy<R>> {
        let reused = self.idle()?.pop();
        Ok(reused.unwrap_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!("monotonic pool grew");
            MonotonicEntropy::new((self.factory)(), self.inc)
        }))
    }

    fn check_in(&self, entropy: MonotonicEntropy<R>) {
        let Ok(mut idle) = self.idle() else {
            return;
        };
        if self.max_idle.is_some_and(|max| idle.len() >= max) {
            #[cfg(feature = "tracing")]
            tracing::trace!("monotonic pool full, dropping generator");
            return;
        }
        idle.push(entropy);
    }

    /// Fills `dest` with monotonic entropy for `ms` from a pooled generator.
    ///
    /// # Errors
    ///
    /// - [`Error::MonotonicOverflow`] when the checked-out generator is
    ///   exhausted for `ms`.
    /// - A poisoned free-list lock (not with `parking-lot`).
    /// - Any error of the underlying source.
    ///
    /// [`Error::MonotonicOverflow`]: crate::Error::MonotonicOverflow
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, dest)))]
    pub fn fill_monotonic(&self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        let mut entropy = self.check_out()?;
        let res = entropy.fill_monotonic(ms, dest);
        self.check_in(entropy);
        res
    }

    /// Generates a ULID for `ms` from a pooled generator.
    ///
    /// # Errors
    ///
    /// See [`Self::fill_monotonic`] and [`Ulid::new`].
    pub fn next_ulid(&self, ms: u64) -> Result<Ulid> {
        let mut src = self;
        Ulid::with_monotonic(ms, &mut src)
    }
}

impl<R, F> core::fmt::Debug for PooledMonotonic<R, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PooledMonotonic")
            .field("inc", &self.inc)
            .field("max_idle", &self.max_idle)
            .finish_non_exhaustive()
    }
}

impl<R, F> MonotonicSource for &PooledMonotonic<R, F>
where
    R: RandSource,
    F: Fn() -> R,
{
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        PooledMonotonic::<R, F>::fill_monotonic(self, ms, dest)
    }
}

impl<R, F> MonotonicSource for PooledMonotonic<R, F>
where
    R: RandSource,
    F: Fn() -> R,
{
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        Self::fill_monotonic(self, ms, dest)
    }
}
