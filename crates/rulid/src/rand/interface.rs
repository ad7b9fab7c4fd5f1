use crate::{Result, U80};

/// A source of random bytes for a ULID's entropy field.
///
/// Implementations decide how bytes are produced: the OS CSPRNG, a
/// thread-local RNG, a seeded RNG for tests, or a constant.
///
/// # Example
///
/// ```
/// use rulid::{RandSource, Result};
///
/// struct Fives;
/// impl RandSource for Fives {
///     fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
///         dest.fill(5);
///         Ok(())
///     }
/// }
///
/// let mut buf = [0; 4];
/// Fives.fill_bytes(&mut buf)?;
/// assert_eq!(buf, [5; 4]);
/// # Ok::<(), rulid::Error>(())
/// ```
pub trait RandSource {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot produce bytes, e.g.
    /// [`Error::EntropySource`] when the OS RNG fails.
    ///
    /// [`Error::EntropySource`]: crate::Error::EntropySource
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()>;

    /// Returns a uniform value in `[0, bound)` from a native bounded-integer
    /// primitive, or `None` if the source has none.
    ///
    /// Callers fall back to rejection sampling over [`fill_bytes`] when this
    /// returns `None`. `bound` is never zero.
    ///
    /// [`fill_bytes`]: RandSource::fill_bytes
    fn random_below(&mut self, bound: u64) -> Option<u64> {
        let _ = bound;
        None
    }
}

impl<R: RandSource + ?Sized> RandSource for &mut R {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }

    fn random_below(&mut self, bound: u64) -> Option<u64> {
        (**self).random_below(bound)
    }
}

impl<R: RandSource + ?Sized> RandSource for Box<R> {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<()> {
        (**self).fill_bytes(dest)
    }

    fn random_below(&mut self, bound: u64) -> Option<u64> {
        (**self).random_below(bound)
    }
}

/// A source that can fill entropy so that successive calls for the same
/// millisecond produce strictly increasing values.
pub trait MonotonicSource {
    /// Fills `dest` with entropy for the millisecond `ms`.
    ///
    /// Within one `ms`, each call yields a value strictly greater than the
    /// previous one handed out by the same underlying generator.
    ///
    /// # Errors
    ///
    /// - [`Error::MonotonicOverflow`] when the 80-bit counter would wrap.
    /// - Any error of the underlying [`RandSource`].
    ///
    /// [`Error::MonotonicOverflow`]: crate::Error::MonotonicOverflow
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()>;
}

impl<M: MonotonicSource + ?Sized> MonotonicSource for &mut M {
    fn fill_monotonic(&mut self, ms: u64, dest: &mut [u8; U80::BYTES]) -> Result<()> {
        (**self).fill_monotonic(ms, dest)
    }
}

/// How [`Ulid::new`] obtains the 80 entropy bits.
///
/// The caller picks the capability explicitly; a monotonic source passed
/// as [`Entropy::Random`] is read like any other byte source.
///
/// [`Ulid::new`]: crate::Ulid::new
pub enum Entropy<'a> {
    /// Leave the entropy field zeroed.
    None,
    /// Plain random bytes.
    Random(&'a mut dyn RandSource),
    /// Monotonic fill for the identifier's millisecond.
    Monotonic(&'a mut dyn MonotonicSource),
}

impl core::fmt::Debug for Entropy<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::None => "Entropy::None",
            Self::Random(_) => "Entropy::Random",
            Self::Monotonic(_) => "Entropy::Monotonic",
        })
    }
}
